use crate::domain::error::DomainError;

pub struct DomainValidator;

impl DomainValidator {
    /// Artifact names double as file stems and Python identifiers.
    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(DomainError::InvalidArgument {
                field: "name",
                reason: "name cannot be empty".into(),
            });
        };

        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(DomainError::InvalidArgument {
                field: "name",
                reason: format!("'{name}' must start with a letter or '_'"),
            });
        }

        if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(DomainError::InvalidArgument {
                field: "name",
                reason: format!("'{name}' contains invalid character '{bad}'"),
            });
        }

        Ok(())
    }
}
