//! Prompt templates for the recommendation step.
//!
//! Templates use plain `format!()` interpolation so a missing variable is a
//! compile-time error.

/// Build the prompt asking the model to rank retrieved jobs for a profile.
///
/// The model is told to answer with a bare JSON array whose objects carry the
/// keys "Job Title", "Company", "Match Reason" and "Apply Link", which is the
/// shape [`crate::recommend::parse_recommendations`] expects.
///
/// # Example
/// ```
/// use jobmatch::llm::prompts::job_recommendation_prompt;
///
/// let prompt = job_recommendation_prompt("Skills: Rust", "Backend Engineer | Acme");
/// assert!(prompt.contains("Skills: Rust"));
/// assert!(prompt.contains("Backend Engineer | Acme"));
/// ```
pub fn job_recommendation_prompt(user_profile: &str, retrieved_jobs: &str) -> String {
    format!(
        r#"You are a job recommendation assistant.
Given the user's profile and retrieved job postings, recommend the top matching jobs.

USER PROFILE:
{user_profile}

RETRIEVED JOBS:
{retrieved_jobs}

---
Return your answer strictly as a valid JSON array of job objects.
Each object must have:
- "Job Title"
- "Company"
- "Match Reason"
- "Apply Link"

Do not include any text before or after the JSON.
Example format:
[
  {{
    "Job Title": "Data Analyst",
    "Company": "ABC Corp",
    "Match Reason": "Matches SQL and Python skills, remote-friendly",
    "Apply Link": "https://example.com/job"
  }}
]"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_profile_and_jobs() {
        let prompt = job_recommendation_prompt(
            "Skills: Python, SQL",
            "Data Analyst | ABC Corp | Apply: https://abc.example/1",
        );

        assert!(prompt.contains("USER PROFILE:\nSkills: Python, SQL"));
        assert!(prompt.contains("RETRIEVED JOBS:\nData Analyst | ABC Corp"));
    }

    #[test]
    fn test_prompt_names_every_output_key() {
        let prompt = job_recommendation_prompt("", "");
        for key in ["\"Job Title\"", "\"Company\"", "\"Match Reason\"", "\"Apply Link\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_prompt_example_is_valid_json() {
        let prompt = job_recommendation_prompt("p", "j");
        let start = prompt.rfind("[\n").unwrap();
        let example: serde_json::Value = serde_json::from_str(&prompt[start..]).unwrap();
        assert_eq!(example[0]["Company"], "ABC Corp");
    }
}
