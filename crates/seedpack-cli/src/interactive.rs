//! Interactive flow for the init command.
//!
//! Walks the Configure → Review → Deploy stepper in the terminal.
//! Uses dialoguer for terminal UI prompts.

use std::io::{self, Write};

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, MultiSelect, Select, theme::ColorfulTheme};

use seedpack_core::api::DeployRequest;
use seedpack_core::error::SelectionError;
use seedpack_core::package::Package;
use seedpack_core::policy::{ComponentSelectionPolicy, ComponentView};
use seedpack_core::workflow::{StepStatus, Stepper};

/// Pre-filled values from CLI args that skip prompts.
#[derive(Debug, Clone, Default)]
pub struct PrefilledOptions {
    /// Package path - if Some, skip package selection
    pub package: Option<String>,
    /// Optional components to deploy - if Some, skip component selection
    pub components: Option<Vec<String>>,
    /// Skip all confirmations
    pub yes: bool,
    /// Expand every component and show its manifest
    pub details: bool,
}

/// Result of the wizard.
#[derive(Debug, Clone)]
pub struct WizardResult {
    /// Request to submit once the Deploy stage is reached
    pub request: DeployRequest,
    /// Whether user confirmed the deployment
    pub confirmed: bool,
}

/// Terminal rendition of the package stepper.
pub struct InitWizard<W: Write = io::Stdout> {
    /// Pre-filled options from CLI args
    prefilled: PrefilledOptions,
    /// Output writer (for testing)
    writer: W,
    /// Theme for dialoguer prompts
    theme: ColorfulTheme,
}

impl InitWizard<io::Stdout> {
    pub fn new(prefilled: PrefilledOptions) -> Self {
        Self {
            prefilled,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> InitWizard<W> {
    /// Create a wizard with custom writer (for testing).
    #[cfg(test)]
    pub fn with_writer(prefilled: PrefilledOptions, writer: W) -> Self {
        Self {
            prefilled,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Pick the package to configure from the paths the backend found.
    pub fn choose_package(&self, paths: &[String]) -> Result<String> {
        if let Some(path) = &self.prefilled.package {
            return Ok(path.clone());
        }

        match paths.len() {
            0 => anyhow::bail!("No init package found. Pass --package to choose one explicitly"),
            1 => Ok(paths[0].clone()),
            _ => {
                let selection = Select::with_theme(&self.theme)
                    .with_prompt("Select init package")
                    .items(paths)
                    .default(0)
                    .interact()?;
                Ok(paths[selection].clone())
            }
        }
    }

    /// Run the stepper for `package`.
    ///
    /// Flow:
    /// 1. Configure: show package details and select optional components
    /// 2. Review: show the final selection and confirm
    /// 3. Deploy: build the deploy request
    pub fn run(&mut self, package: Package) -> Result<WizardResult> {
        let mut stepper = Stepper::new(ComponentSelectionPolicy::initialize(package));

        // Step 1: Configure
        self.print_steps(&stepper)?;
        self.print_package(stepper.policy().package())?;
        if self.prefilled.details {
            expand_manifests(&mut stepper)?;
        }
        self.select_components(&mut stepper)?;

        // Step 2: Review
        stepper
            .advance()
            .context("Configuration is not ready for review")?;
        self.print_steps(&stepper)?;
        self.print_components(&stepper.snapshot())?;
        let confirmed = self.confirm()?;

        // Step 3: Deploy
        if confirmed {
            stepper.advance().context("Review is not ready for deployment")?;
            self.print_steps(&stepper)?;
        }

        let request = DeployRequest::from_policy(stepper.policy())
            .ok_or_else(|| anyhow::anyhow!("Package has no backend path to deploy from"))?;

        Ok(WizardResult { request, confirmed })
    }

    fn print_steps(&mut self, stepper: &Stepper) -> Result<()> {
        writeln!(self.writer)?;
        let steps: Vec<String> = stepper
            .steps()
            .into_iter()
            .map(|(stage, status)| {
                let label = format!("{} {}", stage.step_number(), stage);
                match status {
                    StepStatus::Complete => style(label).green().to_string(),
                    StepStatus::Current => style(label).bold().cyan().to_string(),
                    StepStatus::Upcoming => style(label).dim().to_string(),
                }
            })
            .collect();
        writeln!(self.writer, "  {}", steps.join("  ─  "))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_package(&mut self, package: &Package) -> Result<()> {
        writeln!(self.writer, "  Package Type {}", style(package.kind()).green())?;
        write!(self.writer, "  Meta data Name: {}", style(package.name()).green())?;
        if let Some(description) = &package.metadata().description {
            write!(self.writer, " Description: {}", description)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn select_components(&mut self, stepper: &mut Stepper) -> Result<()> {
        for view in stepper.snapshot() {
            if view.component.required {
                writeln!(
                    self.writer,
                    "  {} {}",
                    style("[x]").dim(),
                    style(view.component.label()).dim()
                )?;
                self.print_manifest(&view)?;
            }
        }

        let wanted: Vec<String> = match &self.prefilled.components {
            Some(components) => components.clone(),
            None if self.prefilled.yes => return Ok(()),
            None => self.prompt_components(stepper)?,
        };

        apply_selection(stepper, &wanted)
    }

    /// Ungrouped optional components in one multi-select, then one select per
    /// group so at most one member of a group can be picked.
    fn prompt_components(&self, stepper: &Stepper) -> Result<Vec<String>> {
        let snapshot = stepper.snapshot();
        let mut wanted = Vec::new();

        let ungrouped: Vec<&ComponentView<'_>> = snapshot
            .iter()
            .filter(|view| view.state.enabled && view.component.group.is_none())
            .collect();
        if !ungrouped.is_empty() {
            let labels: Vec<String> = ungrouped.iter().map(|view| describe(view)).collect();
            let defaults: Vec<bool> = ungrouped.iter().map(|view| view.state.checked).collect();

            let selections = MultiSelect::with_theme(&self.theme)
                .with_prompt("Optional components (space to toggle, enter to confirm)")
                .items(&labels)
                .defaults(&defaults)
                .interact()?;
            wanted.extend(
                selections
                    .iter()
                    .map(|&i| ungrouped[i].component.name.clone()),
            );
        }

        let mut groups: Vec<&str> = Vec::new();
        for view in &snapshot {
            if let Some(group) = view.component.group.as_deref()
                && view.state.enabled
                && !groups.contains(&group)
            {
                groups.push(group);
            }
        }

        for group in groups {
            let members: Vec<&ComponentView<'_>> = snapshot
                .iter()
                .filter(|view| view.state.enabled && view.component.group.as_deref() == Some(group))
                .collect();
            let mut labels: Vec<String> = members.iter().map(|view| describe(view)).collect();
            labels.push("None".to_string());
            let default = members
                .iter()
                .position(|view| view.state.checked)
                .unwrap_or(members.len());

            let selection = Select::with_theme(&self.theme)
                .with_prompt(format!("Choose one '{}' component", group))
                .items(&labels)
                .default(default)
                .interact()?;
            if let Some(view) = members.get(selection) {
                wanted.push(view.component.name.clone());
            }
        }

        Ok(wanted)
    }

    fn print_manifest(&mut self, view: &ComponentView<'_>) -> Result<()> {
        if !view.state.expanded || view.component.manifest_fragment.is_empty() {
            return Ok(());
        }
        for line in view.component.manifest_fragment.lines() {
            writeln!(self.writer, "      {}", style(line).dim())?;
        }
        Ok(())
    }

    fn print_components(&mut self, snapshot: &[ComponentView<'_>]) -> Result<()> {
        writeln!(self.writer, "{}", style("  Components").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;
        for view in snapshot {
            let mark = if view.state.checked { "[x]" } else { "[ ]" };
            let line = format!("  {} {}", mark, view.component.label());
            if view.state.checked {
                writeln!(self.writer, "{}", style(line).green())?;
            } else {
                writeln!(self.writer, "{}", style(line).dim())?;
            }
            self.print_manifest(view)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn confirm(&self) -> Result<bool> {
        if self.prefilled.yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Deploy this package?")
            .default(true)
            .interact()?;

        Ok(confirmed)
    }
}

fn describe(view: &ComponentView<'_>) -> String {
    match &view.component.description {
        Some(description) => format!("{} - {}", view.component.label(), description),
        None => view.component.label(),
    }
}

/// Make `wanted` the optional selection. Required names are skipped with a
/// warning; unknown names and two members of one group are errors.
fn apply_selection(stepper: &mut Stepper, wanted: &[String]) -> Result<()> {
    let mut optional = Vec::new();
    for name in wanted {
        match stepper.policy().package().component(name) {
            Some(component) if component.required => {
                tracing::warn!(component = %name, "Required component is always deployed")
            }
            _ => optional.push(name.as_str()),
        }
    }
    stepper.select_optional(&optional)?;
    Ok(())
}

/// Open the details of every component that has a manifest to show.
fn expand_manifests(stepper: &mut Stepper) -> Result<(), SelectionError> {
    let names: Vec<String> = stepper
        .snapshot()
        .iter()
        .filter(|view| !view.state.expanded && !view.component.manifest_fragment.is_empty())
        .map(|view| view.component.name.clone())
        .collect();
    for name in names {
        stepper.toggle_expanded(&name)?;
    }
    Ok(())
}
