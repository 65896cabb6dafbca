//! Component selection policy.
//!
//! Decides, for every component of a loaded package, whether its selector is
//! checked, whether the user may change it, and whether the workflow may move
//! on. Selector state is never stored: [`selector_states`] derives it from the
//! package and the user's overrides on every call, so the rule
//! `required => checked && !enabled` holds no matter what was toggled before.

pub mod rules;

use std::collections::{HashMap, HashSet};
use std::fmt;

pub use rules::{AdvanceRule, MinimumSelection};

use crate::error::SelectionError;
use crate::package::{Component, Package};
use crate::types::WorkflowStage;

/// What a component's selector shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectorState {
    pub checked: bool,
    /// Whether the user may change `checked`.
    pub enabled: bool,
    /// Whether the component's details are open. Never affects gating.
    pub expanded: bool,
}

/// A component paired with its derived selector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentView<'a> {
    pub component: &'a Component,
    pub state: SelectorState,
}

pub fn selector_state(
    component: &Component,
    overrides: &HashMap<String, bool>,
    expanded: &HashSet<String>,
) -> SelectorState {
    let checked = component.required
        || overrides
            .get(&component.name)
            .copied()
            .unwrap_or(component.default_enabled);
    SelectorState {
        checked,
        enabled: !component.required,
        expanded: expanded.contains(&component.name),
    }
}

/// Selector state for every component, in package order.
pub fn selector_states<'a>(
    package: &'a Package,
    overrides: &HashMap<String, bool>,
    expanded: &HashSet<String>,
) -> Vec<ComponentView<'a>> {
    package
        .components()
        .iter()
        .map(|component| ComponentView {
            component,
            state: selector_state(component, overrides, expanded),
        })
        .collect()
}

pub struct ComponentSelectionPolicy {
    package: Package,
    /// Only optional components have an entry.
    overrides: HashMap<String, bool>,
    expanded: HashSet<String>,
    rules: Vec<Box<dyn AdvanceRule>>,
}

impl fmt::Debug for ComponentSelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSelectionPolicy")
            .field("package", &self.package.name())
            .field("overrides", &self.overrides)
            .field("expanded", &self.expanded)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl ComponentSelectionPolicy {
    /// Start a session with every optional component at its default.
    ///
    /// Only the first default-on member of a group starts checked.
    pub fn initialize(package: Package) -> Self {
        let mut claimed = HashSet::new();
        let overrides = package
            .optional_components()
            .map(|c| {
                let checked = match c.group.as_deref() {
                    Some(group) if c.default_enabled => claimed.insert(group.to_string()),
                    _ => c.default_enabled,
                };
                (c.name.clone(), checked)
            })
            .collect();
        Self {
            package,
            overrides,
            expanded: HashSet::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: impl AdvanceRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Closure form of [`Self::with_rule`].
    pub fn with_predicate<F>(self, predicate: F) -> Self
    where
        F: Fn(WorkflowStage, &[ComponentView<'_>]) -> bool + Send + Sync + 'static,
    {
        self.with_rule(predicate)
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn is_checked(&self, component: &Component) -> bool {
        selector_state(component, &self.overrides, &self.expanded).checked
    }

    pub fn is_enabled(&self, component: &Component) -> bool {
        !component.required
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Flip an optional component and return its new checked state.
    ///
    /// Checking a grouped component unchecks the other members of its group.
    pub fn toggle(&mut self, name: &str) -> Result<bool, SelectionError> {
        let component = self
            .package
            .component(name)
            .ok_or_else(|| SelectionError::UnknownComponent(name.to_string()))?;
        if component.required {
            return Err(SelectionError::InvalidOperation {
                component: name.to_string(),
            });
        }

        let checked = !selector_state(component, &self.overrides, &self.expanded).checked;
        self.overrides.insert(component.name.clone(), checked);

        if checked && let Some(group) = component.group.as_deref() {
            for sibling in self.package.optional_components() {
                if sibling.name != name && sibling.group.as_deref() == Some(group) {
                    self.overrides.insert(sibling.name.clone(), false);
                }
            }
        }

        Ok(checked)
    }

    /// Replace the optional selection with exactly `names`.
    ///
    /// Nothing changes when a name is unknown or required, or when two names
    /// belong to the same group.
    pub fn select_optional<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), SelectionError> {
        let mut groups: HashMap<&str, &str> = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let component = self
                .package
                .component(name)
                .ok_or_else(|| SelectionError::UnknownComponent(name.to_string()))?;
            if component.required {
                return Err(SelectionError::InvalidOperation {
                    component: name.to_string(),
                });
            }
            if let Some(group) = component.group.as_deref()
                && let Some(first) = groups.insert(group, name)
                && first != name
            {
                return Err(SelectionError::GroupConflict {
                    group: group.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
        }

        for component in self.package.optional_components() {
            let wanted = names.iter().any(|name| name.as_ref() == component.name);
            self.overrides.insert(component.name.clone(), wanted);
        }
        Ok(())
    }

    /// Open or close a component's details and return whether it is now open.
    pub fn toggle_expanded(&mut self, name: &str) -> Result<bool, SelectionError> {
        if self.package.component(name).is_none() {
            return Err(SelectionError::UnknownComponent(name.to_string()));
        }
        if self.expanded.remove(name) {
            Ok(false)
        } else {
            self.expanded.insert(name.to_string());
            Ok(true)
        }
    }

    /// Whether the workflow may move on from `from`.
    ///
    /// Never from the last stage. Otherwise every required component must be
    /// checked and every registered rule must agree.
    pub fn can_advance(&self, from: WorkflowStage) -> bool {
        if from.next().is_none() {
            return false;
        }
        let snapshot = self.snapshot();
        if snapshot
            .iter()
            .any(|view| view.component.required && !view.state.checked)
        {
            return false;
        }
        self.rules.iter().all(|rule| rule.allows(from, &snapshot))
    }

    /// Current selector state of every component, in package order.
    pub fn snapshot(&self) -> Vec<ComponentView<'_>> {
        selector_states(&self.package, &self.overrides, &self.expanded)
    }

    /// Names of every checked component, required ones included.
    pub fn selected_components(&self) -> Vec<&str> {
        self.snapshot()
            .into_iter()
            .filter(|view| view.state.checked)
            .map(|view| view.component.name.as_str())
            .collect()
    }

    /// Names of checked optional components. Required ones are implied.
    pub fn optional_selection(&self) -> Vec<&str> {
        self.snapshot()
            .into_iter()
            .filter(|view| view.state.checked && !view.component.required)
            .map(|view| view.component.name.as_str())
            .collect()
    }
}
