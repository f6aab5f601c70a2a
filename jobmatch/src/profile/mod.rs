//! Profile Builder: turns the user's free-text fields into one retrieval query.

pub mod resume;

pub use resume::{extract_resume_text, read_resume, ResumeFormat};

/// Résumé excerpts longer than this are cut before entering the profile.
pub const DEFAULT_MAX_RESUME_CHARS: usize = 4000;

/// Concatenate the non-empty, trimmed inputs in the order skills, experience,
/// preferences, résumé.
///
/// No separator is inserted between blocks; callers that want readable output
/// label each block themselves (see [`ProfileInput::build`]). The résumé is
/// truncated to `max_resume_chars` characters after trimming. An empty result
/// means there is no usable profile.
pub fn build_profile(
    skills: &str,
    experience: &str,
    preferences: &str,
    resume_text: &str,
    max_resume_chars: usize,
) -> String {
    let resume = truncate_chars(resume_text.trim(), max_resume_chars);

    [skills.trim(), experience.trim(), preferences.trim(), resume]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect()
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => &text[..byte_offset],
        None => text,
    }
}

/// The four raw profile fields as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileInput {
    pub skills: String,
    pub experience: String,
    pub preferences: String,
    pub resume: String,
}

impl ProfileInput {
    pub fn new(skills: &str, experience: &str, preferences: &str, resume: &str) -> Self {
        Self {
            skills: skills.to_string(),
            experience: experience.to_string(),
            preferences: preferences.to_string(),
            resume: resume.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        [&self.skills, &self.experience, &self.preferences, &self.resume]
            .iter()
            .all(|field| field.trim().is_empty())
    }

    /// Build the profile with every non-empty field prefixed by its label
    /// ("Skills: ...", "Experience: ...").
    ///
    /// The résumé body is cut to `max_resume_chars` before "Resume Summary:"
    /// is prepended.
    pub fn build(&self, max_resume_chars: usize) -> String {
        fn label(prefix: &str, value: &str) -> String {
            if value.is_empty() {
                String::new()
            } else {
                format!("{prefix}{value}")
            }
        }

        let resume = truncate_chars(self.resume.trim(), max_resume_chars);

        build_profile(
            &label("Skills: ", self.skills.trim()),
            &label("Experience: ", self.experience.trim()),
            &label("Preferences: ", self.preferences.trim()),
            &label("Resume Summary:", resume),
            usize::MAX,
        )
    }
}
