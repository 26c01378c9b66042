use serde::{Deserialize, Serialize};

/// A candidate's profile document as returned by the backend's
/// `/students/profile` endpoint.
///
/// The backend returns a flat JSON object carrying these keys among others
/// (bio, links, certifications, …); only the sections that drive interview
/// personalization are modeled here, and every one of them defaults to empty
/// so a missing or partial document deserializes cleanly. `Default` is the
/// empty document used whenever the profile cannot be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub internships: Vec<InternshipEntry>,
}

impl CandidateProfile {
    /// Returns `true` when no section carries any entries — either the
    /// candidate never filled their profile in, or the fetch degraded.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
            && self.projects.is_empty()
            && self.education.is_empty()
            && self.internships.is_empty()
    }
}

/// One project from the candidate's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// One education record from the candidate's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
}

/// One internship record from the candidate's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
}
