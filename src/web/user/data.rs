use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl LoginData {
    pub fn validate(&self) -> bool {
        let email = self.email.trim();
        if email.is_empty() || email.len() > 100 {
            return false;
        }
        match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str) -> LoginData {
        LoginData {
            email: email.to_string(),
            csrf_token: String::new(),
        }
    }

    #[test]
    fn email_needs_both_parts() {
        assert!(login("a@a").validate());
        assert!(login(" employee@test.tld ").validate());
        assert!(!login("").validate());
        assert!(!login("@test.tld").validate());
        assert!(!login("employee").validate());
        assert!(!login(&format!("{}@a", "x".repeat(100))).validate());
    }
}
