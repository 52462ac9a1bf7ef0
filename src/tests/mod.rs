// Copyright 2026 Simo Sorce
// See LICENSE.txt file for terms

use std::collections::HashMap;

use super::*;
use crate::pkcs11::*;

#[macro_use]
mod util;
use util::*;

mod config;
mod params;

/* An in memory token.
 * Objects are kept as plain attribute lists indexed by handle, failures
 * can be injected per operation. */
struct MemoryToken {
    objects: HashMap<CK_OBJECT_HANDLE, Vec<Attribute>>,
    next_handle: CK_OBJECT_HANDLE,
    last_pair: KeyHandlePair,
    mechanisms: Vec<CK_MECHANISM_TYPE>,
    generate_rv: Option<CK_RV>,
    private_copy_rv: Option<CK_RV>,
    public_copy_rv: Option<CK_RV>,
    copies: Vec<CK_OBJECT_HANDLE>,
}

impl MemoryToken {
    fn new() -> MemoryToken {
        MemoryToken {
            objects: HashMap::new(),
            next_handle: 1,
            last_pair: KeyHandlePair::default(),
            mechanisms: Vec::new(),
            generate_rv: None,
            private_copy_rv: None,
            public_copy_rv: None,
            copies: Vec::new(),
        }
    }

    fn fail_generate(mut self, rv: CK_RV) -> MemoryToken {
        self.generate_rv = Some(rv);
        self
    }

    fn fail_private_copy(mut self, rv: CK_RV) -> MemoryToken {
        self.private_copy_rv = Some(rv);
        self
    }

    fn fail_public_copy(mut self, rv: CK_RV) -> MemoryToken {
        self.public_copy_rv = Some(rv);
        self
    }

    fn store(&mut self, attrs: Vec<Attribute>) -> CK_OBJECT_HANDLE {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.objects.insert(handle, attrs);
        handle
    }

    fn count(&self) -> usize {
        self.objects.len()
    }

    fn attr(
        &self,
        handle: CK_OBJECT_HANDLE,
        typ: CK_ATTRIBUTE_TYPE,
    ) -> Option<&Attribute> {
        self.objects.get(&handle)?.iter().find(|a| a.get_type() == typ)
    }

    fn get_bool(
        &self,
        handle: CK_OBJECT_HANDLE,
        typ: CK_ATTRIBUTE_TYPE,
    ) -> Option<bool> {
        self.attr(handle, typ).and_then(|a| a.to_bool().ok())
    }

    fn get_bytes(
        &self,
        handle: CK_OBJECT_HANDLE,
        typ: CK_ATTRIBUTE_TYPE,
    ) -> Option<Vec<u8>> {
        self.attr(handle, typ).map(|a| a.get_value().to_vec())
    }
}

impl Token for MemoryToken {
    fn generate_key_pair(
        &mut self,
        mechanism: CK_MECHANISM_TYPE,
        public: &AttributeSet,
        private: &AttributeSet,
    ) -> Result<KeyHandlePair> {
        self.mechanisms.push(mechanism);
        if let Some(rv) = self.generate_rv {
            return Err(Error::ck_rv(rv, "C_GenerateKeyPair"));
        }
        let mut pubattrs: Vec<Attribute> = public.iter().cloned().collect();
        pubattrs.push(Attribute::from_ulong(CKA_CLASS, CKO_PUBLIC_KEY));
        let mut privattrs: Vec<Attribute> = private.iter().cloned().collect();
        privattrs.push(Attribute::from_ulong(CKA_CLASS, CKO_PRIVATE_KEY));
        let pair = KeyHandlePair {
            public: self.store(pubattrs),
            private: self.store(privattrs),
        };
        self.last_pair = pair;
        Ok(pair)
    }

    fn copy_object(
        &mut self,
        handle: CK_OBJECT_HANDLE,
        template: &AttributeSet,
    ) -> Result<CK_OBJECT_HANDLE> {
        let injected = if handle == self.last_pair.private {
            self.private_copy_rv
        } else if handle == self.last_pair.public {
            self.public_copy_rv
        } else {
            None
        };
        if let Some(rv) = injected {
            return Err(Error::ck_rv(rv, "C_CopyObject"));
        }
        let mut attrs = match self.objects.get(&handle) {
            Some(o) => o.clone(),
            None => {
                return Err(Error::ck_rv(CKR_OBJECT_HANDLE_INVALID, "C_CopyObject"))
            }
        };
        for t in template {
            match attrs.iter_mut().find(|a| a.get_type() == t.get_type()) {
                Some(a) => *a = t.clone(),
                None => attrs.push(t.clone()),
            }
        }
        let newh = self.store(attrs);
        self.copies.push(newh);
        Ok(newh)
    }
}
