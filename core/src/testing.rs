//! Scripted command runner for tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ports::{CommandOutput, CommandRunner, Invocation};

type Response = Result<CommandOutput, io::ErrorKind>;

struct Rule {
    program: String,
    arg: Option<String>,
    responses: VecDeque<Response>,
    last: Option<Response>,
}

impl Rule {
    fn matches(&self, invocation: &Invocation) -> bool {
        self.program == invocation.program
            && self
                .arg
                .as_ref()
                .map_or(true, |arg| invocation.args.iter().any(|a| a == arg))
    }

    fn next(&mut self) -> Option<Response> {
        match self.responses.pop_front() {
            Some(r) => {
                self.last = Some(r.clone());
                Some(r)
            }
            None => self.last.clone(),
        }
    }
}

#[derive(Default)]
struct State {
    rules: Vec<Rule>,
    calls: Vec<Invocation>,
}

/// Returns canned outputs per program and records every invocation.
///
/// Responses queued for a rule are handed out in order; once drained the last
/// one repeats. Programs with no rule fail as if the tool were not installed.
#[derive(Clone, Default)]
pub(crate) struct ScriptedRunner {
    state: Arc<Mutex<State>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, program: &str, arg: Option<&str>, response: Response) -> &Self {
        let mut state = self.state.lock();
        let existing = state
            .rules
            .iter_mut()
            .find(|r| r.program == program && r.arg.as_deref() == arg);
        match existing {
            Some(rule) => rule.responses.push_back(response),
            None => state.rules.push(Rule {
                program: program.to_string(),
                arg: arg.map(str::to_string),
                responses: VecDeque::from([response]),
                last: None,
            }),
        }
        self
    }

    /// Queue an output for every invocation of `program`.
    pub(crate) fn on(&self, program: &str, output: CommandOutput) -> &Self {
        self.push(program, None, Ok(output))
    }

    /// Queue an output for invocations of `program` that pass `arg`.
    /// Rules with an argument must be registered before catch-all rules.
    pub(crate) fn on_arg(&self, program: &str, arg: &str, output: CommandOutput) -> &Self {
        self.push(program, Some(arg), Ok(output))
    }

    /// Queue a spawn failure for `program`.
    pub(crate) fn on_spawn_error(&self, program: &str, kind: io::ErrorKind) -> &Self {
        self.push(program, None, Err(kind))
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.state.lock().calls.clone()
    }

    /// Recorded invocations of `program`, optionally restricted to those
    /// passing `arg`.
    pub(crate) fn calls_to(&self, program: &str, arg: Option<&str>) -> Vec<Invocation> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.program == program)
            .filter(|c| arg.map_or(true, |a| c.args.iter().any(|x| x == a)))
            .cloned()
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        let mut state = self.state.lock();
        state.calls.push(invocation.clone());
        let response = state
            .rules
            .iter_mut()
            .find(|r| r.matches(invocation))
            .and_then(Rule::next);
        match response {
            Some(Ok(output)) => Ok(output),
            Some(Err(kind)) => Err(io::Error::new(kind, format!("{} failed", invocation.program))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: command not found", invocation.program),
            )),
        }
    }
}

/// Successful run with the given stdout.
pub(crate) fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        status: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// Failed run with the given exit code and streams.
pub(crate) fn fail(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}
