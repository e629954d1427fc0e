use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Recruiter,
    Applicant,
    User,
    Admin,
}

/// Login form body. Fields are optional so missing ones can be reported.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Credentials forwarded to the upstream auth endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn into_credentials(self) -> Option<Credentials> {
        Some(Credentials {
            email: non_empty(self.email)?,
            password: non_empty(self.password)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Account creation body forwarded upstream.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupProblem {
    MissingFields,
    UnknownRole(String),
}

impl SignupRequest {
    pub fn into_account(self) -> Result<NewAccount, SignupProblem> {
        let (Some(email), Some(password), Some(name), Some(role)) = (
            non_empty(self.email),
            non_empty(self.password),
            non_empty(self.name),
            non_empty(self.role),
        ) else {
            return Err(SignupProblem::MissingFields);
        };

        let role = serde_json::from_value(serde_json::Value::String(role.clone()))
            .map_err(|_| SignupProblem::UnknownRole(role))?;

        Ok(NewAccount {
            email,
            password,
            name,
            role,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
