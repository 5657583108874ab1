use std::fmt::Display;

/// objectAccessControls resource, used both as the insert body (only the
/// set fields are serialized) and as the response shape.
#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAccessControl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectAccessControl {
    /// Minimum insert body granting `entity` read access.
    pub fn reader(entity: &str) -> Self {
        Self {
            entity: Some(entity.to_owned()),
            role: Some(Role::Reader),
            ..Default::default()
        }
    }
}

#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Reader,
    Writer,
    Owner,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            Role::Reader => "READER",
            Role::Writer => "WRITER",
            Role::Owner => "OWNER",
        };
        write!(f, "{}", role)
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectAccessControl, Role};

    #[test]
    fn test_reader_insert_body() {
        let body = serde_json::to_string(&ObjectAccessControl::reader("allUsers")).unwrap();
        assert_eq!(r#"{"entity":"allUsers","role":"READER"}"#, body);
    }

    #[test]
    fn test_acl_response_deserialization() {
        let raw = r#"{
            "kind": "storage#objectAccessControl",
            "id": "b1/english-dictionary/allUsers",
            "bucket": "b1",
            "object": "english-dictionary",
            "entity": "allUsers",
            "role": "READER",
            "etag": "CAE="
        }"#;

        let acl: ObjectAccessControl = serde_json::from_str(raw).unwrap();
        assert_eq!(Some("allUsers".to_owned()), acl.entity);
        assert_eq!(Some(Role::Reader), acl.role);
        assert_eq!(Some("b1".to_owned()), acl.bucket);
    }

    #[test]
    fn test_role_display() {
        assert_eq!("READER", Role::Reader.to_string());
        assert_eq!("OWNER", Role::Owner.to_string());
    }
}
