//! Run Planner
//!
//! Decides which test groups or benchmarks a run covers.
//!
//! Selection order:
//! - An explicit target on the command line (`group` or `group/case`)
//! - Otherwise the names listed in `trialbench.toml`
//! - Otherwise every directory discovered under the cases root
//!
//! A `--filter` regex then narrows the selection. Order is left as given:
//! discovery has already shuffled it.

use regex::Regex;

/// A test target given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Group name
    pub group: String,
    /// Single case to run, from `group/case`
    pub case: Option<String>,
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, case) = match s.split_once('/') {
            Some((group, case)) => (group, Some(case)),
            None => (s, None),
        };
        if group.is_empty() || case.is_some_and(str::is_empty) {
            return Err(format!("Invalid target '{}', expected <group> or <group>/<case>", s));
        }
        Ok(Target {
            group: group.to_string(),
            case: case.map(str::to_string),
        })
    }
}

/// Names selected for a run, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Group or benchmark names
    pub names: Vec<String>,
}

/// Build a plan from the configured names, falling back to `discover`.
///
/// `discover` is only called when `configured` is empty.
pub fn build_plan<E>(
    configured: &[String],
    discover: impl FnOnce() -> Result<Vec<String>, E>,
    filter: Option<&Regex>,
) -> Result<RunPlan, E> {
    let candidates = if configured.is_empty() {
        discover()?
    } else {
        configured.to_vec()
    };

    let names = candidates
        .into_iter()
        .filter(|name| filter.is_none_or(|re| re.is_match(name)))
        .collect();

    Ok(RunPlan { names })
}
