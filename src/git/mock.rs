use crate::error::{GitrelError, Result};
use crate::git::Repository;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A mutating call recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Fetch(String),
    CreateBranch(String),
    CreateBranchAt { name: String, start_point: String },
    Checkout(String),
    SwitchBack,
    Merge(String),
    Push { remote: String, refspec: String },
}

impl SideEffect {
    pub fn fetch(remote: &str) -> Self {
        SideEffect::Fetch(remote.to_string())
    }

    pub fn create_branch(name: &str) -> Self {
        SideEffect::CreateBranch(name.to_string())
    }

    pub fn create_branch_at(name: &str, start_point: &str) -> Self {
        SideEffect::CreateBranchAt {
            name: name.to_string(),
            start_point: start_point.to_string(),
        }
    }

    pub fn checkout(name: &str) -> Self {
        SideEffect::Checkout(name.to_string())
    }

    pub fn merge(name: &str) -> Self {
        SideEffect::Merge(name.to_string())
    }

    /// Push record; `a:a` is normalised to `a`
    pub fn push(remote: &str, refspec: &str) -> Self {
        let refspec = match refspec.split_once(':') {
            Some((local, remote_name)) if local == remote_name => local,
            _ => refspec,
        };

        SideEffect::Push {
            remote: remote.to_string(),
            refspec: refspec.to_string(),
        }
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffect::Fetch(remote) => write!(f, "fetch {}", remote),
            SideEffect::CreateBranch(name) => write!(f, "create branch {}", name),
            SideEffect::CreateBranchAt { name, start_point } => {
                write!(f, "create branch {} at {}", name, start_point)
            }
            SideEffect::Checkout(name) => write!(f, "checkout {}", name),
            SideEffect::SwitchBack => write!(f, "switch back"),
            SideEffect::Merge(name) => write!(f, "merge {}", name),
            SideEffect::Push { remote, refspec } => write!(f, "push {} {}", remote, refspec),
        }
    }
}

/// Operation a [MockRepository] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    Fetch,
    CreateBranch,
    Checkout,
    SwitchBack,
    Merge,
    Push,
}

#[derive(Debug, Default)]
struct MockState {
    branches: Vec<String>,
    current_branch: String,
    previous_branch: Option<String>,
    remotes: Vec<String>,
    uncommitted_changes: bool,
    failing: Option<MockOperation>,
    side_effects: Vec<SideEffect>,
}

/// In-memory repository for testing without actual git operations
///
/// Starts on `main` with a single `origin` remote. Every mutating call is
/// appended to an ordered side-effect log.
#[derive(Debug)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    pub fn new() -> Self {
        MockRepository {
            state: Mutex::new(MockState {
                branches: vec!["main".to_string()],
                current_branch: "main".to_string(),
                remotes: vec!["origin".to_string()],
                ..MockState::default()
            }),
        }
    }

    /// Replace the branch list (`git branch -a` naming)
    pub fn with_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_mut().branches = branches.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_branch(mut self, name: &str) -> Self {
        self.state_mut().current_branch = name.to_string();
        self
    }

    pub fn with_remotes<I, S>(mut self, remotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_mut().remotes = remotes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_uncommitted_changes(mut self) -> Self {
        self.state_mut().uncommitted_changes = true;
        self
    }

    /// Make one operation fail with an external error
    pub fn failing_on(mut self, operation: MockOperation) -> Self {
        self.state_mut().failing = Some(operation);
        self
    }

    /// Mutating calls performed so far, in order
    pub fn side_effects(&self) -> Vec<SideEffect> {
        self.state().side_effects.clone()
    }

    pub fn branches(&self) -> Vec<String> {
        self.state().branches.clone()
    }

    pub fn current(&self) -> String {
        self.state().current_branch.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn check(&self, operation: MockOperation) -> Result<()> {
        if self.failing == Some(operation) {
            return Err(GitrelError::external(format!(
                "simulated {:?} failure",
                operation
            )));
        }
        Ok(())
    }

    fn switch_to(&mut self, name: &str) {
        let previous = std::mem::replace(&mut self.current_branch, name.to_string());
        self.previous_branch = Some(previous);
    }
}

impl Repository for MockRepository {
    fn list_all_branches(&self) -> Result<Vec<String>> {
        Ok(self.branches())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state().branches.iter().any(|branch| branch == name))
    }

    fn checkout(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        state.check(MockOperation::Checkout)?;
        if !state.branches.iter().any(|branch| branch == name) {
            return Err(GitrelError::external(format!("branch {} does not exist", name)));
        }

        state.side_effects.push(SideEffect::checkout(name));
        state.switch_to(name);
        Ok(())
    }

    fn create_and_switch(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        state.check(MockOperation::CreateBranch)?;
        if state.branches.iter().any(|branch| branch == name) {
            return Err(GitrelError::external(format!("branch {} already exists", name)));
        }

        state.side_effects.push(SideEffect::create_branch(name));
        state.side_effects.push(SideEffect::checkout(name));
        state.branches.push(name.to_string());
        state.switch_to(name);
        Ok(())
    }

    fn create_branch_from(&self, name: &str, start_point: &str) -> Result<()> {
        let mut state = self.state();
        state.check(MockOperation::CreateBranch)?;
        if !state.branches.iter().any(|branch| branch == start_point) {
            return Err(GitrelError::external(format!(
                "start point {} does not exist",
                start_point
            )));
        }
        if state.branches.iter().any(|branch| branch == name) {
            return Err(GitrelError::external(format!("branch {} already exists", name)));
        }

        state
            .side_effects
            .push(SideEffect::create_branch_at(name, start_point));
        state.branches.push(name.to_string());
        Ok(())
    }

    fn switch_back(&self) -> Result<()> {
        let mut state = self.state();
        state.check(MockOperation::SwitchBack)?;
        let previous = state
            .previous_branch
            .clone()
            .ok_or_else(|| GitrelError::external("no previous branch to switch back to"))?;

        state.side_effects.push(SideEffect::SwitchBack);
        state.switch_to(&previous);
        Ok(())
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        let mut state = self.state();
        state.check(MockOperation::Push)?;
        state.side_effects.push(SideEffect::push(remote, refspec));
        Ok(())
    }

    fn merge(&self, branch: &str) -> Result<()> {
        let mut state = self.state();
        state.check(MockOperation::Merge)?;
        state.side_effects.push(SideEffect::merge(branch));
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.current())
    }

    fn list_remotes(&self) -> Result<Vec<String>> {
        Ok(self.state().remotes.clone())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        let mut state = self.state();
        state.check(MockOperation::Fetch)?;
        state.side_effects.push(SideEffect::fetch(remote));
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.state().uncommitted_changes)
    }
}
