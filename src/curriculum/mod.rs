//! Curriculum generation over a chat completion service
//!
//! Five independent operations, each a pure function of its textual input
//! and a fixed prompt template. No state is shared between calls; the
//! interactive caller keeps intermediate results and feeds them forward.

mod client;

pub use client::{
    ChatMessage, CompletionClient, CompletionError, CompletionRequest, GroqClient,
};

use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are a helpful academic assistant.";
const RESOURCE_SYSTEM_PROMPT: &str =
    "You are a helpful academic assistant recommending learning resources.";

const DEFAULT_TEMPERATURE: f32 = 0.5;
const RESOURCE_TEMPERATURE: f32 = 0.6;

/// Generator for the five curriculum artifacts
pub struct CurriculumGenerator {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl CurriculumGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn generate(
        &self,
        system: &str,
        prompt: String,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            temperature,
        };

        let text = self.client.complete(&request)?;
        Ok(text.trim().to_string())
    }

    /// Break a topic into weekly subtopics using retrieved syllabus context
    pub fn decompose_topic(&self, topic: &str, context: &str) -> Result<String, CompletionError> {
        let prompt = format!(
            "You are a helpful academic assistant. Based on the following syllabus context, \
             decompose the topic \"{topic}\" into weekly subtopics. Return it as a numbered list.\n\n\
             ### Syllabus Context:\n{context}\n"
        );

        self.generate(SYSTEM_PROMPT, prompt, DEFAULT_TEMPERATURE)
    }

    /// Expand weekly subtopics into a detailed lesson plan
    pub fn plan_lessons(&self, weekly_subtopics: &str) -> Result<String, CompletionError> {
        let prompt = format!(
            "You are an academic assistant helping to plan lessons for university-level \
             instruction.\n\n\
             Given the following list of weekly subtopics, generate a detailed weekly lesson \
             plan. For **each week**, include:\n\n\
             - A brief summary of what will be covered\n\
             - 3-5 **learning objectives**\n\
             - 3-5 **key concepts**\n\
             - Suggested **daily breakdown** (e.g., Day 1: ..., Day 2: ...)\n\
             - At least one **in-class activity** or discussion idea\n\n\
             ### Weekly Subtopics:\n{weekly_subtopics}\n\n\
             Return the full curriculum in a clean, markdown-style format.\n"
        );

        self.generate(SYSTEM_PROMPT, prompt, DEFAULT_TEMPERATURE)
    }

    /// Generate quiz questions from a lesson plan
    pub fn generate_quiz(&self, lesson_plan: &str) -> Result<String, CompletionError> {
        let prompt = format!(
            "You are an assistant capable of generating quizzes and questions for testing \
             students' understanding. Generate questions for each day of the lesson plan \
             provided. Each question should be clear, concise, and test the key concepts \
             covered that day. Include a mix of question types like multiple choice, short \
             answer, and long answer worth 1, 3, and 5 marks each. Provide at least 10 \
             questions from each day of the lesson plan.\n\n\
             ### Lesson Plan:\n{lesson_plan}\n\n\
             Return the quiz in a clean, markdown-style format.\n"
        );

        self.generate(SYSTEM_PROMPT, prompt, DEFAULT_TEMPERATURE)
    }

    /// Suggest publicly available resources for each week of a plan
    pub fn recommend_resources(&self, weekly_plan: &str) -> Result<String, CompletionError> {
        let prompt = format!(
            "You are an academic assistant. Based on the following weekly curriculum plan, \
             suggest 2 high-quality resources for each week:\n\
             - 1 video or online lecture (preferably YouTube or MOOC)\n\
             - 1 article or book reference\n\n\
             Only use publicly available resources (no paywalls).\n\
             ### Weekly Curriculum Plan:\n{weekly_plan}\n\n\
             Return the suggestions in this format:\n\n\
             Week X:\n\
             - Video: [Title] - [URL]\n\
             - Reading: [Title or Chapter] - [Source or Author]\n"
        );

        self.generate(RESOURCE_SYSTEM_PROMPT, prompt, RESOURCE_TEMPERATURE)
    }

    /// Create assignments reinforcing each week's subtopics
    pub fn make_assignments(&self, weekly_subtopics: &str) -> Result<String, CompletionError> {
        let prompt = format!(
            "You are an academic curriculum assistant. Based on the following weekly \
             subtopics, create thoughtful, real-world assignments to reinforce the topics.\n\n\
             Each assignment should include:\n\
             - Title\n\
             - Objective (what the student will learn)\n\
             - Instructions (step-by-step)\n\
             - Deliverables\n\
             - (Optional) A simple grading rubric\n\n\
             Generate 1-2 assignments per week. Be creative and align tasks with \
             higher-order thinking skills.\n\n\
             ### Weekly Subtopics:\n{weekly_subtopics}\n\n\
             Return the output in markdown format, organized week by week.\n"
        );

        self.generate(SYSTEM_PROMPT, prompt, DEFAULT_TEMPERATURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Deterministic stub that echoes the request back
    struct StubClient {
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubClient {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for StubClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request.clone());
            // Trailing whitespace exercises the trim on the way out
            Ok(format!("  generated:{}  \n", request.messages[1].content.len()))
        }
    }

    #[test]
    fn test_decompose_topic_is_deterministic() {
        let client = Arc::new(StubClient::new());
        let generator = CurriculumGenerator::new(client.clone(), "test-model");

        let first = generator.decompose_topic("Graphs", "").unwrap();
        let second = generator.decompose_topic("Graphs", "").unwrap();

        assert_eq!(first, second);
        assert!(!first.starts_with(' '));
        assert!(!first.ends_with('\n'));
    }

    #[test]
    fn test_prompt_embeds_inputs() {
        let client = Arc::new(StubClient::new());
        let generator = CurriculumGenerator::new(client.clone(), "test-model");

        generator
            .decompose_topic("Quantum Mechanics", "Week 1: wave functions")
            .unwrap();

        let requests = client.requests.lock().unwrap();
        let prompt = &requests[0].messages[1].content;
        assert!(prompt.contains("\"Quantum Mechanics\""));
        assert!(prompt.contains("Week 1: wave functions"));
        assert_eq!(requests[0].messages[0].role, "system");
        assert_eq!(requests[0].temperature, 0.5);
    }

    #[test]
    fn test_resource_recommendation_temperature() {
        let client = Arc::new(StubClient::new());
        let generator = CurriculumGenerator::new(client.clone(), "test-model");

        generator.recommend_resources("Week 1: graphs").unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, 0.6);
        assert!(requests[0].messages[0]
            .content
            .contains("recommending learning resources"));
    }

    #[test]
    fn test_operations_share_no_state() {
        let client = Arc::new(StubClient::new());
        let generator = CurriculumGenerator::new(client.clone(), "test-model");

        let quiz = generator.generate_quiz("Day 1: sorting").unwrap();
        let assignments = generator.make_assignments("Week 1: sorting").unwrap();
        let quiz_again = generator.generate_quiz("Day 1: sorting").unwrap();

        assert_eq!(quiz, quiz_again);
        assert_ne!(quiz, assignments);
    }
}
