//! The five inputs of the certificate request form.

use nameth::nameth;

/// Identifies one input of the form.
///
/// The [id](FieldId::id) is both the DOM element id and the JSON key sent to the server.
#[nameth]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    Authority,
    CommonName,
    Owner,
    ValidityStart,
    ValidityEnd,
}

impl FieldId {
    pub const ALL: [Self; 5] = [
        Self::Authority,
        Self::CommonName,
        Self::Owner,
        Self::ValidityStart,
        Self::ValidityEnd,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Authority => "authority",
            Self::CommonName => "commonName",
            Self::Owner => "owner",
            Self::ValidityStart => "validityStart",
            Self::ValidityEnd => "validityEnd",
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Read and write access to the form inputs.
pub trait FormFields {
    fn value(&self, field: FieldId) -> String;
    fn set_value(&self, field: FieldId, value: &str);

    fn clear_all(&self) {
        for field in FieldId::ALL {
            self.set_value(field, "");
        }
    }
}

impl<T: FormFields + ?Sized> FormFields for &T {
    fn value(&self, field: FieldId) -> String {
        (**self).value(field)
    }

    fn set_value(&self, field: FieldId, value: &str) {
        (**self).set_value(field, value)
    }
}
