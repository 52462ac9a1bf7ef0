// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use crate::config::RequestConfig;
use crate::keygen;
use crate::tests::*;

use serial_test::{parallel, serial};

const REQUEST: &str = r#"
label = "k1"
params = "dsa.pem"
mode = "token-for-wrapping"

[[override]]
attribute = "CKA_EXTRACTABLE"
bool = true

[[override]]
attribute = "CKA_ID"
hex = "6b32"
"#;

#[test]
#[parallel]
fn test_parse_request() {
    let conf = ret_or_panic!(RequestConfig::from_str(REQUEST));
    assert_eq!(conf.label, "k1");
    assert_eq!(conf.mode, GenerationMode::TokenForWrapping);
    assert!(conf.id.is_none());
    let overrides = ret_or_panic!(conf.override_attributes());
    assert_eq!(
        overrides,
        vec![
            Attribute::from_bool(CKA_EXTRACTABLE, true),
            Attribute::from_bytes(CKA_ID, vec![0x6b, 0x32]),
        ]
    );
}

#[test]
#[parallel]
fn test_bad_overrides() {
    for (body, msg) in [
        ("attribute = \"CKA_NOPE\"\nbool = true", "unknown attribute"),
        ("attribute = \"CKA_SIGN\"\nstring = \"yes\"", "bad value"),
        ("attribute = \"CKA_SIGN\"\nbool = true\nulong = 1", "bad value"),
        ("attribute = \"CKA_ID\"\nhex = \"zz\"", ""),
    ] {
        let text = format!(
            "label = \"k1\"\nparams = \"p\"\nmode = \"session\"\n\
             [[override]]\n{}\n",
            body
        );
        let conf = ret_or_panic!(RequestConfig::from_str(&text));
        let err = conf.override_attributes().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains(msg));
    }

    let err = RequestConfig::from_str(
        "label = \"k1\"\nparams = \"p\"\nmode = \"wrapping\"\n",
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
#[parallel]
fn test_typed_overrides() {
    let text = r#"
label = "k1"
params = "p"
mode = "session"

[[override]]
attribute = "CKA_LABEL"
string = "k2"

[[override]]
attribute = "CKA_KEY_GEN_MECHANISM"
ulong = 16
"#;
    let conf = ret_or_panic!(RequestConfig::from_str(text));
    let overrides = ret_or_panic!(conf.override_attributes());
    assert_eq!(overrides[0].to_string().unwrap(), "k2");
    assert_eq!(overrides[1].to_ulong().unwrap(), CKM_DSA_KEY_PAIR_GEN);
}

#[test]
#[parallel]
fn test_relative_params_path() {
    let abs = testdata(DSA_PARAMS_PEM).display().to_string();
    let text = REQUEST.replace("dsa.pem", &abs);
    let f = TempFile::new("request-abs.toml", text.as_bytes());
    let conf = ret_or_panic!(RequestConfig::from_file(
        &f.path().display().to_string()
    ));
    assert_eq!(conf.params_path(), testdata(DSA_PARAMS_PEM));

    let mut conf = ret_or_panic!(RequestConfig::from_str(REQUEST));
    conf.basedir = Some(testdata(""));
    assert_eq!(conf.params_path(), testdata(DSA_PARAMS_PEM));
}

#[test]
#[parallel]
fn test_request_from_config() {
    let mut conf = ret_or_panic!(RequestConfig::from_str(REQUEST));
    conf.basedir = Some(testdata(""));
    conf.id = Some("cafe".to_string());
    let obs = RecordingObserver::new();
    let request = ret_or_panic!(conf.into_request(&obs));
    assert_eq!(request.id, Some(vec![0xca, 0xfe]));
    assert_eq!(request.params.q().len(), 20);

    let mut token = MemoryToken::new();
    let out = ret_or_panic!(keygen::run(&mut token, &request, &obs));
    let privc = out.copies.private.unwrap();
    assert_eq!(token.get_bool(privc, CKA_EXTRACTABLE), Some(true));
    /* the CKA_ID override has the same length as the configured id */
    assert_eq!(
        token.get_bytes(out.handles.public, CKA_ID).unwrap(),
        vec![0x6b, 0x32]
    );
}

#[test]
#[serial]
fn test_find_conf_env() {
    std::env::set_var("DSAKEYGEN_CONF", "/etc/dsakeygen/request.toml");
    let found = RequestConfig::find_conf();
    std::env::remove_var("DSAKEYGEN_CONF");
    assert_eq!(ret_or_panic!(found), "/etc/dsakeygen/request.toml");
}
