use std::collections::HashMap;

use super::values::RuntimeVal;

// Variables of one function activation. Frames are never chained: a callee
// only sees its own parameters and what it creates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Frame {
    vars: HashMap<String, RuntimeVal>,
}

impl Frame {
    pub fn new() -> Self {
        Default::default()
    }

    // Reading an unknown variable creates it with 0
    pub fn read_var(&mut self, var: &str) -> RuntimeVal {
        self.vars
            .entry(var.to_string())
            .or_insert_with(|| RuntimeVal::int(0))
            .clone()
    }

    pub fn assign_var(&mut self, var: &str, value: RuntimeVal) {
        self.vars.insert(var.to_string(), value);
    }

    // Read only lookup, for display and tests. Does not create the variable
    pub fn get(&self, var: &str) -> Option<RuntimeVal> {
        self.vars.get(var).cloned()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    // Variables ordered by name
    pub fn sorted(&self) -> Vec<(&String, &RuntimeVal)> {
        let mut vars: Vec<_> = self.vars.iter().collect();
        vars.sort_by(|a, b| a.0.cmp(b.0));
        vars
    }
}

// Call stack. The bottom frame holds the top level variables of the session
// and is never popped.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStore {
    frames: Vec<Frame>,
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStore {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    // Returns None instead of removing the bottom frame
    pub fn pop_frame(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn current(&self) -> &Frame {
        // There is always at least the bottom frame
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // Drops every call frame left by an interrupted call, keeping the top
    // level variables
    pub fn truncate_to_global(&mut self) {
        self.frames.truncate(1);
    }

    pub fn clear(&mut self) {
        self.frames = vec![Frame::new()];
    }
}
