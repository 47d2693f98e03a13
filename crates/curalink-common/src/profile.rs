use serde::{Deserialize, Serialize};

/// The interest-bearing part of a user profile.
///
/// Patients usually fill `conditions`; researchers fill `research_interests`
/// and `specialties`. Any of the three may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub research_interests: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl UserProfile {
    pub fn patient<I, S>(conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            conditions: conditions.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn researcher<I, J, S>(research_interests: I, specialties: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            conditions: Vec::new(),
            research_interests: research_interests.into_iter().map(Into::into).collect(),
            specialties: specialties.into_iter().map(Into::into).collect(),
        }
    }
}
