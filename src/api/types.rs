use serde::Deserialize;
use serde_json::Value;

use crate::form::ImageFile;

/// Normalized profile as sent to `POST /add_user`.
///
/// The server names the company field `companyname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSubmission {
    pub email: String,
    pub name: String,
    pub age: String,
    pub role: String,
    pub companyname: String,
    pub file: Option<ImageFile>,
}

/// Body of `GET /getuserlist`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}
