//! ReAct executor: Thought → Action → Observation until an Answer.
//!
//! The model speaks a small text protocol (`Thought:` / `Action:` /
//! `Action Input:` / `Answer:`); tool results are fed back as
//! `Observation:` turns. A leading `[USE_TOOL: name]` directive is not advice:
//! the named tool runs as iteration one before the model is consulted.
//!
//! History lives in the `ChatMemory` passed to each call, not in the agent,
//! so one `ReactAgent` serves every session.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::memory::ChatMemory;
use super::prompts::{
    FINAL_ANSWER_INSTRUCTION, FORCED_THOUGHT_TEMPLATE, REACT_PROMPT_TEMPLATE, SYSTEM_PROMPT,
};
use super::AgentError;
use crate::llm_client::{json_object_span, ChatMessage, LanguageModel};
use crate::tools::{job_id_arg, truncate_chars, ToolError, ToolRegistry};

pub const USE_TOOL_MARKER: &str = "[USE_TOOL:";
pub const SELECTED_JOB_MARKER: &str = "[Selected job_id:";

/// Observations longer than this are cut before going back to the model.
const OBSERVATION_CHARS: usize = 2000;

/// What to do when `max_iterations` is reached without an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Fail with `AgentError::IterationLimit`.
    Force,
    /// Ask the model once more for its best answer from what it has gathered.
    Generate,
}

#[derive(Debug, Error)]
#[error("Unknown stop policy '{0}' (expected 'force' or 'generate')")]
pub struct UnknownStopPolicy(String);

impl FromStr for StopPolicy {
    type Err = UnknownStopPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "force" => Ok(StopPolicy::Force),
            "generate" => Ok(StopPolicy::Generate),
            other => Err(UnknownStopPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentStep {
    pub thought: Option<String>,
    pub action: String,
    pub input: Value,
    pub observation: String,
    pub forced: bool,
}

#[derive(Debug, Clone)]
pub struct AgentRun {
    pub answer: String,
    pub iterations: usize,
    pub steps: Vec<AgentStep>,
}

/// Routing markers stripped from the front of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directives {
    pub forced_tool: Option<String>,
    pub job_id: Option<String>,
    pub question: String,
}

/// Reads any leading `[USE_TOOL: x]` / `[Selected job_id: y]` markers, in any order.
pub fn parse_directives(query: &str) -> Directives {
    let mut directives = Directives::default();
    let mut rest = query.trim_start();
    loop {
        let (found, remainder) = if let Some(after) = rest.strip_prefix(USE_TOOL_MARKER) {
            match after.split_once(']') {
                Some((value, remainder)) => {
                    directives.forced_tool = Some(value.trim().to_string());
                    (true, remainder)
                }
                None => (false, rest),
            }
        } else if let Some(after) = rest.strip_prefix(SELECTED_JOB_MARKER) {
            match after.split_once(']') {
                Some((value, remainder)) => {
                    directives.job_id = Some(value.trim().to_string());
                    (true, remainder)
                }
                None => (false, rest),
            }
        } else {
            (false, rest)
        };
        if !found {
            break;
        }
        rest = remainder.trim_start();
    }
    directives.forced_tool = directives.forced_tool.filter(|t| !t.is_empty());
    directives.job_id = directives.job_id.filter(|j| !j.is_empty());
    directives.question = rest.trim().to_string();
    directives
}

/// One parsed model turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Answer(String),
    Action {
        thought: Option<String>,
        tool: String,
        input: Value,
    },
}

/// Tolerant reader for the text protocol. Whichever of `Action:` / `Answer:`
/// appears first wins; text with neither is taken as the answer itself.
pub fn parse_reply(text: &str) -> Reply {
    let text = text.trim();
    let action_at = text.find("Action:");
    let answer_at = text.find("Answer:");

    let thought = text
        .strip_prefix("Thought:")
        .map(|t| {
            let end = [t.find("Action:"), t.find("Answer:")]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(t.len());
            t[..end].trim().to_string()
        })
        .filter(|t| !t.is_empty());

    match (action_at, answer_at) {
        (Some(a), answer) if answer.map_or(true, |b| a < b) => {
            let after = &text[a + "Action:".len()..];
            let (tool_part, input_part) = match after.split_once("Action Input:") {
                Some((tool, input)) => (tool, input),
                None => (after, ""),
            };
            let tool = tool_part.lines().next().unwrap_or("").trim();
            let tool = tool.trim_end_matches("()").trim_matches('`').to_string();
            let input_part = input_part
                .split("Observation:")
                .next()
                .unwrap_or("")
                .trim();
            Reply::Action {
                thought,
                tool,
                input: parse_action_input(input_part),
            }
        }
        (_, Some(b)) => Reply::Answer(text[b + "Answer:".len()..].trim().to_string()),
        _ => Reply::Answer(
            text.strip_prefix("Thought:")
                .unwrap_or(text)
                .trim()
                .to_string(),
        ),
    }
}

fn parse_action_input(raw: &str) -> Value {
    if raw.is_empty() {
        return json!({});
    }
    if let Some(span) = json_object_span(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return value;
        }
    }
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub struct ReactAgent {
    llm: Arc<dyn LanguageModel>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
}

impl ReactAgent {
    pub fn new(llm: Arc<dyn LanguageModel>, tools: Arc<ToolRegistry>) -> Self {
        let system_prompt = REACT_PROMPT_TEMPLATE
            .replace("{system_prompt}", SYSTEM_PROMPT)
            .replace("{tool_descriptions}", &tools.describe())
            .replace("{tool_names}", &tools.names().join(", "));
        Self {
            llm,
            tools,
            system_prompt,
        }
    }

    /// Runs the loop for one query. On success the question and answer are
    /// appended to `memory`; on failure memory is left untouched.
    pub async fn run(
        &self,
        query: &str,
        memory: &mut ChatMemory,
        max_iterations: usize,
        stop_policy: StopPolicy,
    ) -> Result<AgentRun, AgentError> {
        let directives = parse_directives(query);

        let mut messages = Vec::with_capacity(memory.len() + 2);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(memory.messages().cloned());
        messages.push(ChatMessage::user(query));

        let mut steps = Vec::new();
        let mut iterations = 0;

        if let Some(tool) = &directives.forced_tool {
            if self.tools.get(tool).is_some() {
                iterations += 1;
                info!("Forced first action: {tool}");
                let thought = FORCED_THOUGHT_TEMPLATE.replace("{tool}", tool);
                let step = self
                    .act(Some(thought), tool, json!({}), directives.job_id.as_deref(), true)
                    .await;
                push_step(&mut messages, &step);
                steps.push(step);
            } else {
                warn!("Ignoring directive for unknown tool {tool}");
            }
        }

        while iterations < max_iterations {
            iterations += 1;
            let reply = self.llm.chat(&messages).await?;
            debug!("Iteration {iterations} model output: {}", reply.content);

            match parse_reply(&reply.content) {
                Reply::Answer(answer) => {
                    info!("Answer after {iterations} iterations, {} tool calls", steps.len());
                    return Ok(finish(memory, &directives, answer, iterations, steps));
                }
                Reply::Action {
                    thought,
                    tool,
                    input,
                } => {
                    let step = self
                        .act(thought, &tool, input, directives.job_id.as_deref(), false)
                        .await;
                    push_step(&mut messages, &step);
                    steps.push(step);
                }
            }
        }

        warn!("Reached {max_iterations} iterations without an answer");
        match stop_policy {
            StopPolicy::Force => Err(AgentError::IterationLimit(max_iterations)),
            StopPolicy::Generate => {
                messages.push(ChatMessage::user(FINAL_ANSWER_INSTRUCTION));
                match self.llm.chat(&messages).await {
                    Ok(reply) => {
                        let answer = match parse_reply(&reply.content) {
                            Reply::Answer(answer) => answer,
                            Reply::Action { .. } => reply.content.trim().to_string(),
                        };
                        Ok(finish(memory, &directives, answer, iterations, steps))
                    }
                    Err(e) => {
                        warn!("Final answer generation failed: {e}");
                        Err(AgentError::IterationLimit(max_iterations))
                    }
                }
            }
        }
    }

    /// Executes one tool call. Tool failures become observations, never errors.
    async fn act(
        &self,
        thought: Option<String>,
        tool: &str,
        mut input: Value,
        selected_job: Option<&str>,
        forced: bool,
    ) -> AgentStep {
        if let (Some(job_id), Some(t)) = (selected_job, self.tools.get(tool)) {
            if t.takes_job_id() && job_id_arg(tool, &input).is_err() {
                input = json!({ "job_id": job_id });
            }
        }

        let observation = match self.tools.execute(tool, input.clone()).await {
            Ok(value) => truncate_chars(&value.to_string(), OBSERVATION_CHARS),
            Err(ToolError::NotFound(name)) => format!(
                "Error: unknown tool {name}. Available tools: {}",
                self.tools.names().join(", ")
            ),
            Err(e) => format!("Error: {e}"),
        };
        debug!("Observation from {tool}: {observation}");

        AgentStep {
            thought,
            action: tool.to_string(),
            input,
            observation,
            forced,
        }
    }
}

fn push_step(messages: &mut Vec<ChatMessage>, step: &AgentStep) {
    let mut turn = String::new();
    if let Some(thought) = &step.thought {
        turn.push_str(&format!("Thought: {thought}\n"));
    }
    turn.push_str(&format!(
        "Action: {}\nAction Input: {}",
        step.action, step.input
    ));
    messages.push(ChatMessage::assistant(turn));
    messages.push(ChatMessage::user(format!("Observation: {}", step.observation)));
}

fn finish(
    memory: &mut ChatMemory,
    directives: &Directives,
    answer: String,
    iterations: usize,
    steps: Vec<AgentStep>,
) -> AgentRun {
    memory.push(ChatMessage::user(directives.question.clone()));
    memory.push(ChatMessage::assistant(answer.clone()));
    AgentRun {
        answer,
        iterations,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::RESUME_COLLECTION;
    use crate::llm_client::Role;
    use crate::test_support::ScriptedLlm;
    use crate::tools::build_all_tools;
    use crate::tools::test_fixtures::{fixture, Fixture};

    fn agent(fx: &Fixture) -> ReactAgent {
        ReactAgent::new(fx.llm.clone(), Arc::new(build_all_tools(fx.ctx.clone())))
    }

    #[test]
    fn test_parse_directives_both_markers() {
        let d = parse_directives("[USE_TOOL: fit_score] [Selected job_id: 42] how do I fit?");
        assert_eq!(d.forced_tool.as_deref(), Some("fit_score"));
        assert_eq!(d.job_id.as_deref(), Some("42"));
        assert_eq!(d.question, "how do I fit?");
    }

    #[test]
    fn test_parse_directives_plain_and_unterminated() {
        assert_eq!(parse_directives("hello").question, "hello");
        let d = parse_directives("[USE_TOOL: list_jobs what");
        assert_eq!(d.forced_tool, None);
        assert_eq!(d.question, "[USE_TOOL: list_jobs what");
        let d = parse_directives("[Selected job_id: ] hi");
        assert_eq!(d.job_id, None);
    }

    #[test]
    fn test_stop_policy_from_str() {
        assert_eq!("force".parse::<StopPolicy>().unwrap(), StopPolicy::Force);
        assert_eq!(" Generate ".parse::<StopPolicy>().unwrap(), StopPolicy::Generate);
        assert!("early".parse::<StopPolicy>().is_err());
    }

    #[test]
    fn test_parse_reply_action() {
        let reply = parse_reply(
            "Thought: I need the score.\nAction: fit_score\nAction Input: {\"job_id\": \"a\"}\nObservation: made up",
        );
        assert_eq!(
            reply,
            Reply::Action {
                thought: Some("I need the score.".into()),
                tool: "fit_score".into(),
                input: json!({"job_id": "a"}),
            }
        );
    }

    #[test]
    fn test_parse_reply_answer_and_plain_text() {
        assert_eq!(
            parse_reply("Thought: done.\nAnswer: You fit well."),
            Reply::Answer("You fit well.".into())
        );
        assert_eq!(parse_reply("Just text"), Reply::Answer("Just text".into()));
    }

    #[test]
    fn test_parse_reply_bare_input() {
        let reply = parse_reply("Action: skill_gap_analysis\nAction Input: job7");
        assert!(matches!(reply, Reply::Action { input: Value::String(s), .. } if s == "job7"));
        let reply = parse_reply("Action: list_jobs()");
        assert!(matches!(reply, Reply::Action { tool, input, .. } if tool == "list_jobs" && input == json!({})));
    }

    #[tokio::test]
    async fn test_forced_tool_runs_before_deliberation() {
        let fx = fixture(ScriptedLlm::new().chat_with("Answer: You have one job: ML Engineer."));
        fx.store.insert_text("job_1", "ML Engineer at Acme.").await;
        let agent = agent(&fx);
        let mut memory = ChatMemory::new(2048);

        let run = agent
            .run(
                "[USE_TOOL: list_jobs] what jobs are there",
                &mut memory,
                10,
                StopPolicy::Generate,
            )
            .await
            .unwrap();

        assert_eq!(run.steps[0].action, "list_jobs");
        assert!(run.steps[0].forced);
        assert_eq!(run.iterations, 2);

        // The model's first view already contains the tool's observation.
        let first_call = &fx.llm.conversations()[0];
        let observation = &first_call[first_call.len() - 1];
        assert_eq!(observation.role, Role::User);
        assert!(observation.content.starts_with("Observation: {\"count\":1"));

        let stored: Vec<&str> = memory.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(stored, vec!["what jobs are there", "You have one job: ML Engineer."]);
    }

    #[tokio::test]
    async fn test_model_selected_action_uses_selected_job() {
        let llm = ScriptedLlm::new()
            .chat_with("Thought: need score\nAction: fit_score\nAction Input: {}")
            .chat_with("Answer: 100%");
        let fx = fixture(llm);
        fx.store.insert_text(RESUME_COLLECTION, "Python").await;
        fx.store.insert_text("job_9", "Python").await;
        let mut memory = ChatMemory::new(2048);

        let run = agent(&fx)
            .run("[Selected job_id: 9] my score?", &mut memory, 10, StopPolicy::Force)
            .await
            .unwrap();
        assert_eq!(run.answer, "100%");
        assert_eq!(run.steps[0].input, json!({"job_id": "9"}));
        assert!(run.steps[0].observation.contains("\"score\":1.0"));
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_observation() {
        let llm = ScriptedLlm::new()
            .chat_with("Action: teleport\nAction Input: {}")
            .chat_with("Answer: sorry");
        let fx = fixture(llm);
        let mut memory = ChatMemory::new(2048);
        let run = agent(&fx)
            .run("go", &mut memory, 10, StopPolicy::Force)
            .await
            .unwrap();
        assert!(run.steps[0].observation.starts_with("Error: unknown tool teleport"));
    }

    #[tokio::test]
    async fn test_iteration_limit_with_generate_policy() {
        let llm = ScriptedLlm::new()
            .chat_with("Action: list_jobs\nAction Input: {}")
            .chat_with("Action: list_jobs\nAction Input: {}")
            .chat_with("Best effort answer.");
        let fx = fixture(llm);
        let mut memory = ChatMemory::new(2048);
        let run = agent(&fx)
            .run("jobs?", &mut memory, 2, StopPolicy::Generate)
            .await
            .unwrap();
        assert_eq!(run.answer, "Best effort answer.");
        assert_eq!(run.steps.len(), 2);
        let last_call = fx.llm.conversations().pop().unwrap();
        assert_eq!(last_call.last().unwrap().content, FINAL_ANSWER_INSTRUCTION);
    }

    #[tokio::test]
    async fn test_iteration_limit_with_force_policy() {
        let fx = fixture(ScriptedLlm::new().chat_with("Action: list_jobs\nAction Input: {}"));
        let mut memory = ChatMemory::new(2048);
        let err = agent(&fx)
            .run("jobs?", &mut memory, 1, StopPolicy::Force)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::IterationLimit(1)));
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_surfaces() {
        let fx = fixture(ScriptedLlm::new().chat_fails());
        let mut memory = ChatMemory::new(2048);
        let err = agent(&fx)
            .run("hi", &mut memory, 3, StopPolicy::Generate)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }

    #[tokio::test]
    async fn test_history_is_sent_from_memory() {
        let fx = fixture(ScriptedLlm::new().chat_with("Answer: again"));
        let mut memory = ChatMemory::new(2048);
        memory.push(ChatMessage::user("earlier question"));
        memory.push(ChatMessage::assistant("earlier answer"));
        agent(&fx)
            .run("follow up", &mut memory, 3, StopPolicy::Force)
            .await
            .unwrap();
        let sent = &fx.llm.conversations()[0];
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[1].content, "earlier question");
        assert_eq!(sent[3].content, "follow up");
        assert_eq!(memory.len(), 4);
    }
}
