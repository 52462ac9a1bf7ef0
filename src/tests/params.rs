// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use crate::kasn1::DssParms;
use crate::observer::Event;
use crate::params::{self, DerDecoder, ParamFormat, PemDecoder};
use crate::tests::*;

use serial_test::parallel;

const DSA_Q: &str = "87940dc0762e27aaef90314b7358e98c0bbae805";

#[test]
#[parallel]
fn test_load_der() {
    let obs = RecordingObserver::new();
    let dp = ret_or_panic!(params::load(&testdata(DSA_PARAMS_DER), &obs));
    assert_eq!(dp.p().len(), 256);
    assert_eq!(dp.q().len(), 20);
    assert_eq!(dp.g().len(), 256);
    /* the DER encoding carries a leading zero on p, the export does not */
    assert_eq!(dp.p()[0], 0x92);
    assert_eq!(dp.g()[0], 0x64);
    assert_eq!(hex::encode(dp.q()), DSA_Q);
    assert_eq!(obs.events(), vec![Event::FormatDetected(ParamFormat::Der)]);
}

#[test]
#[parallel]
fn test_load_pem_fallback() {
    let obs = RecordingObserver::new();
    let pem = ret_or_panic!(params::load(&testdata(DSA_PARAMS_PEM), &obs));
    assert_eq!(obs.events(), vec![Event::FormatDetected(ParamFormat::Pem)]);

    let der = ret_or_panic!(params::load(
        &testdata(DSA_PARAMS_DER),
        &LogObserver
    ));
    assert_eq!(pem, der);
}

#[test]
#[parallel]
fn test_load_pem_with_surrounding_text() {
    let pem = std::fs::read_to_string(testdata(DSA_PARAMS_PEM)).unwrap();
    let text = format!("DSA parameters for k1\n\n{}\ntrailing junk\n", pem);
    let f = TempFile::new("pem-surrounded", text.as_bytes());
    let dp = ret_or_panic!(params::load(f.path(), &LogObserver));
    assert_eq!(hex::encode(dp.q()), DSA_Q);
}

#[test]
#[parallel]
fn test_load_pem_skips_other_blocks() {
    let pem = std::fs::read_to_string(testdata(DSA_PARAMS_PEM)).unwrap();
    let text = format!(
        "-----BEGIN CERTIFICATE-----\naGVsbG8=\n-----END CERTIFICATE-----\n{}",
        pem
    );
    let f = TempFile::new("pem-two-blocks", text.as_bytes());
    let obs = RecordingObserver::new();
    let dp = ret_or_panic!(params::load(f.path(), &obs));
    assert_eq!(hex::encode(dp.q()), DSA_Q);
    assert_eq!(obs.events(), vec![Event::FormatDetected(ParamFormat::Pem)]);

    /* no DSA PARAMETERS block at all */
    let f = TempFile::new(
        "pem-cert-only",
        b"-----BEGIN CERTIFICATE-----\naGVsbG8=\n-----END CERTIFICATE-----\n",
    );
    let err = params::load(f.path(), &LogObserver).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterFormat);
}

#[test]
#[parallel]
fn test_load_der_with_trailing_data() {
    let mut der = std::fs::read(testdata(DSA_PARAMS_DER)).unwrap();
    der.push(b'\n');
    let f = TempFile::new("der-trailing-newline", &der);
    let obs = RecordingObserver::new();
    let dp = ret_or_panic!(params::load(f.path(), &obs));
    assert_eq!(dp.p().len(), 256);
    assert_eq!(obs.events(), vec![Event::FormatDetected(ParamFormat::Der)]);
}

#[test]
#[parallel]
fn test_load_empty_file() {
    let f = TempFile::new("empty", &[]);
    let err = params::load(f.path(), &LogObserver).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterFormat);
    assert_eq!(err.rv(), CKR_GENERAL_ERROR);
}

#[test]
#[parallel]
fn test_load_garbage() {
    let f = TempFile::new("garbage", b"-----BEGIN DSA PARAMETERS-----\n!!\n");
    let err = params::load(f.path(), &LogObserver).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterFormat);

    let f = TempFile::new("binary-garbage", &[0xff, 0xfe, 0x30, 0x82]);
    let err = params::load(f.path(), &LogObserver).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterFormat);
}

#[test]
#[parallel]
fn test_load_missing_file() {
    let obs = RecordingObserver::new();
    let path = testdata("no-such-params");
    let err = params::load(&path, &obs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterIo);
    assert!(std::error::Error::source(&err).is_some());
    assert!(obs.events().is_empty());
}

#[test]
#[parallel]
fn test_zero_subprime_is_invalid() {
    let der = DssParms::new(&[0x17], &[0x00], &[0x05])
        .unwrap()
        .to_der()
        .unwrap();
    let f = TempFile::new("zero-q", &der);
    let err = params::load(f.path(), &LogObserver).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDomainParameters);
    assert!(err.to_string().contains(" q "));
}

#[test]
#[parallel]
fn test_each_component_is_checked() {
    let p = vec![0x17];
    let q = vec![0x0b];
    let g = vec![0x05];
    assert!(DomainParameters::new(p.clone(), q.clone(), g.clone()).is_ok());
    for (i, name) in ["p", "q", "g"].iter().enumerate() {
        let mut parts = [p.clone(), q.clone(), g.clone()];
        parts[i].clear();
        let [a, b, c] = parts;
        let err = DomainParameters::new(a, b, c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomainParameters);
        assert_eq!(
            err.to_string(),
            format!("DSA parameter {} has zero length", name)
        );
    }
}

#[test]
#[parallel]
fn test_decoder_order() {
    /* with only the text decoder a binary file is not recognized */
    let obs = RecordingObserver::new();
    let err = params::load_with(&testdata(DSA_PARAMS_DER), &[&PemDecoder], &obs)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterFormat);

    /* and a PEM file is not DER */
    let err = params::load_with(&testdata(DSA_PARAMS_PEM), &[&DerDecoder], &obs)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterFormat);
    assert!(obs.events().is_empty());
}
