//! Runs `scaffold.sh` with bash.

use std::process::{Command, Stdio};

use kitsmith_core::{
    application::{
        ApplicationError,
        ports::{HookInvocation, HookOutcome, ScriptRunner},
    },
    error::KitsmithResult,
};
use tracing::{debug, instrument};

/// Runs hook scripts with an interpreter, inheriting stdout and stderr.
#[derive(Debug, Clone)]
pub struct ShellScriptRunner {
    interpreter: String,
    inherit_output: bool,
}

impl ShellScriptRunner {
    pub fn new() -> Self {
        Self {
            interpreter: "bash".into(),
            inherit_output: true,
        }
    }

    /// Use another interpreter (`sh`, a path to bash, ...).
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Discard the script's output instead of passing it through.
    pub fn quiet(mut self) -> Self {
        self.inherit_output = false;
        self
    }

    fn output_stream(&self) -> Stdio {
        if self.inherit_output {
            Stdio::inherit()
        } else {
            Stdio::null()
        }
    }
}

impl Default for ShellScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRunner for ShellScriptRunner {
    #[instrument(skip_all, fields(script = %invocation.script.display()))]
    fn run(&self, invocation: &HookInvocation) -> KitsmithResult<HookOutcome> {
        debug!(
            interpreter = %self.interpreter,
            cwd = %invocation.working_dir.display(),
            "Running post-generation script"
        );

        let status = Command::new(&self.interpreter)
            .arg(&invocation.script)
            .current_dir(&invocation.working_dir)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(self.output_stream())
            .stderr(self.output_stream())
            .status()
            .map_err(|e| ApplicationError::HookFailed {
                script: invocation.script.clone(),
                reason: e.to_string(),
            })?;

        Ok(HookOutcome {
            exit_code: status.code(),
        })
    }
}
