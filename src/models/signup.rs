use serde::{ Serialize, Deserialize };

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignupRequest {
    /// Every field present and non-empty.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.password]
            .iter()
            .all(|f| f.as_deref().map_or(false, |v| !v.is_empty()))
    }
}

#[derive(Serialize)]
pub struct SignupAccepted {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct SignupRejected {
    pub error: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_counts_as_missing() {
        let req: SignupRequest = serde_json
            ::from_str(r#"{"name":"Alex","email":"","password":"pw"}"#)
            .unwrap();
        assert!(!req.is_complete());
    }

    #[test]
    fn all_fields_present() {
        let req: SignupRequest = serde_json
            ::from_str(r#"{"name":"Alex","email":"a@b.c","password":"pw"}"#)
            .unwrap();
        assert!(req.is_complete());
    }
}
