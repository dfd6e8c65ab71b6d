//! Scripted helper runner shared by the updater unit tests

use crate::error::HelperError;
use crate::helper::HelperRunner;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

/// One recorded helper invocation, with the staged files snapshotted at
/// call time (the staged directory is gone by the time a test can look)
pub(crate) struct RecordedCall {
    pub function: String,
    pub args: Vec<Value>,
    pub env: Vec<(String, String)>,
    pub manifest: Option<String>,
    pub lockfile: Option<String>,
}

/// Helper runner that replays a fixed sequence of responses
pub(crate) struct ScriptedHelper {
    responses: RefCell<VecDeque<Result<Value, String>>>,
    calls: Rc<RefCell<Vec<RecordedCall>>>,
}

impl ScriptedHelper {
    /// Creates a scripted helper and a handle to its recorded calls
    pub(crate) fn new(
        responses: Vec<Result<Value, String>>,
    ) -> (Self, Rc<RefCell<Vec<RecordedCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let helper = Self {
            responses: RefCell::new(responses.into()),
            calls: Rc::clone(&calls),
        };
        (helper, calls)
    }
}

impl HelperRunner for ScriptedHelper {
    fn run(
        &self,
        function: &str,
        args: &[Value],
        working_dir: &Path,
        env: &[(String, String)],
    ) -> Result<Value, HelperError> {
        self.calls.borrow_mut().push(RecordedCall {
            function: function.to_string(),
            args: args.to_vec(),
            env: env.to_vec(),
            manifest: std::fs::read_to_string(working_dir.join("package.json")).ok(),
            lockfile: std::fs::read_to_string(working_dir.join("yarn.lock")).ok(),
        });

        let response = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("helper invoked more times than scripted"));
        response.map_err(HelperError::subprocess_failed)
    }
}
