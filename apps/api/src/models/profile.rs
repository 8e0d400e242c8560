use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Display attributes joined onto retrieval hits by user_id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub location: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Webhook body fired when a profile is created or updated.
#[derive(Debug, Deserialize)]
pub struct ProfileWebhookPayload {
    pub record: ProfileUpsert,
}

/// The profile snapshot the embedding-generation job indexes. The parsed
/// résumé stays an opaque JSON document; only skill names are lifted out.
#[derive(Debug, Deserialize)]
pub struct ProfileUpsert {
    pub user_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_yoe: Option<u32>,
    #[serde(default)]
    pub parsed_resume: Option<Value>,
}

impl ProfileUpsert {
    /// Skill names from `parsed_resume.skills[].name`, blanks dropped.
    pub fn skill_names(&self) -> Vec<String> {
        self.parsed_resume
            .as_ref()
            .and_then(|r| r.get("skills"))
            .and_then(Value::as_array)
            .map(|skills| {
                skills
                    .iter()
                    .filter_map(|s| s.get("name"))
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skill_names_lifted_from_parsed_resume() {
        let profile = ProfileUpsert {
            user_id: Uuid::nil(),
            name: Some("Dana".to_string()),
            total_yoe: Some(4),
            parsed_resume: Some(json!({
                "skills": [
                    {"name": "React"},
                    {"name": "  "},
                    {"name": "TypeScript"},
                    {}
                ]
            })),
        };

        assert_eq!(profile.skill_names(), vec!["React", "TypeScript"]);
    }

    #[test]
    fn test_skill_names_empty_without_resume() {
        let profile = ProfileUpsert {
            user_id: Uuid::nil(),
            name: None,
            total_yoe: None,
            parsed_resume: None,
        };

        assert!(profile.skill_names().is_empty());
    }
}
