//! Builds the two-message instruction payload for a job posting link.

use crate::openai::{ChatRequest, Message};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that extracts job information from job postings.";

/// Renders the user message: task, target link and the exact output schema.
pub fn user_prompt(job_link: &str) -> String {
    format!(
        "Task:\n\
         Given the job posting link: {job_link}, extract and return the following details:\n\
         \n\
         - Company Name\n\
         - Position Name\n\
         - Salary (look for a \"$\" anywhere on the page, that is usually the salary. \
         If it is a range, return the midpoint as an integer formatted with commas and no \"$\". \
         NEVER respond with \"not found\", return null instead)\n\
         - H1B Sponsorship (return \"true\", \"false\" or \"not found\")\n\
         - More Info (any additional relevant details)\n\
         - Skills (list of skills mentioned in the job posting)\n\
         \n\
         Notes:\n\
         - Check the whole page for every requested detail. Only return \"not found\" when absolutely necessary.\n\
         - If H1B or work visas are mentioned, return \"true\" or \"false\" depending on the content. \
         If nothing about \"sponsorship\", \"visa\", \"H1B\" or anything with a similar meaning appears \
         anywhere in the posting, return \"not found\".\n\
         - For skills, include any technical requirements, degrees or tools mentioned, as one comma-separated string.\n\
         \n\
         Response format:\n\
         Respond with ONLY valid JSON matching this schema, with no text before or after it.\n\
         If some information is missing, return null for that field.\n\
         \n\
         {{\n  \
           \"company\": \"Company Name\",\n  \
           \"position\": \"Job Position\",\n  \
           \"salary\": \"xxx,xxx\" | null,\n  \
           \"h1bSponsorship\": \"true\" | \"false\" | \"not found\",\n  \
           \"moreInfo\": \"Additional relevant information\",\n  \
           \"skills\": \"Skill 1, Skill 2, Skill 3\"\n\
         }}"
    )
}

/// The full request for `job_link`; a pure function of its inputs.
pub fn build_request(model: &str, job_link: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![Message::system(SYSTEM_PROMPT), Message::user(user_prompt(job_link))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "https://jobs.example.com/postings/42";

    #[test]
    fn request_has_system_then_user_message() {
        let req = build_request(DEFAULT_MODEL, LINK);
        assert_eq!(req.model, "gpt-3.5-turbo");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(req.messages[1].role, "user");
    }

    #[test]
    fn user_prompt_contains_link_and_all_field_names() {
        let prompt = user_prompt(LINK);
        assert!(prompt.contains(LINK));
        for field in [
            "\"company\"",
            "\"position\"",
            "\"salary\"",
            "\"h1bSponsorship\"",
            "\"moreInfo\"",
            "\"skills\"",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn user_prompt_states_salary_and_sponsorship_rules() {
        let prompt = user_prompt(LINK);
        assert!(prompt.contains("midpoint as an integer formatted with commas and no \"$\""));
        assert!(prompt.contains("return null instead"));
        assert!(prompt.contains("\"true\" | \"false\" | \"not found\""));
        assert!(prompt.contains("\"visa\""));
        assert!(prompt.contains("ONLY valid JSON"));
    }

    #[test]
    fn build_request_is_deterministic() {
        assert_eq!(build_request("m", LINK), build_request("m", LINK));
        assert_ne!(
            build_request("m", LINK),
            build_request("m", "https://other.example.com")
        );
    }
}
