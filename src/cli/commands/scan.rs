//! Run security scans over staged or all repository files.

use anyhow::{Result, bail};

use crate::cli::{Output, ScanFormat};
use crate::config::templates::TemplateStore;
use crate::git::GitRepo;
use crate::hooks::PreCommitRunner;
use crate::install::{Installer, VerifyOutcome};
use crate::language::LanguageAnalyzer;
use crate::scan::pii::PiiScanner;
use crate::scan::scanner::CustomRegexScanner;
use crate::scan::{ScanMode, ScanResult, files_for_mode, merge_scan_results};
use crate::settings::Settings;

/// Execute the scan command.
pub async fn execute(mode: ScanMode, yes: bool, format: ScanFormat, output: &Output) -> Result<()> {
    let root = GitRepo::discover(&std::env::current_dir()?)?.workdir()?;
    let mut settings = Settings::load(&root)?;
    let output = output.with_level(settings.echo.level);

    // A scan only makes sense against a verified install.
    let analyzer = LanguageAnalyzer::new(&settings.repo_files);
    let detected = analyzer.analyze(&root)?;
    let templates = TemplateStore::vendored();
    let installer = Installer::new(&root, &templates, &settings, &output, &output);
    let verify = installer.verify_install(&detected, false, yes)?;
    match verify.outcome {
        VerifyOutcome::InstallSucceeded
        | VerifyOutcome::UpdateSucceeded
        | VerifyOutcome::UpToDate => {}
        outcome => bail!("unable to verify the hooksmith installation ({outcome})"),
    }

    let files = files_for_mode(&root, mode, &settings.repo_files)?;
    output.verbose(&format!("Scanning {} file(s)", files.len()));

    let mut results: Vec<ScanResult> = Vec::new();
    results.push(PiiScanner::new().scan_files(&root, &files));
    let regex_scanner = CustomRegexScanner::new(&settings.scan.custom_regex_patterns)?;
    results.push(regex_scanner.scan_files(&root, &files));

    if PreCommitRunner::is_available() {
        let runner = PreCommitRunner::new(&root, settings.language_support.command_timeout_seconds);
        let hook_result = runner.run_hooks(mode == ScanMode::AllFiles, None).await?;
        results.push(ScanResult {
            successful: hook_result.successful,
            output: hook_result.output,
            failures: vec![],
        });
    } else {
        output.warning("The pre-commit executable was not found on PATH; hook execution skipped.");
    }

    let merged = merge_scan_results(results);

    match format {
        ScanFormat::Json => println!("{}", serde_json::to_string_pretty(&merged)?),
        ScanFormat::Text => {
            if !merged.output.is_empty() {
                output.print(&merged.output);
            }
        }
    }

    if merged.successful {
        output.success("Scan complete. No issues found.");
        return Ok(());
    }

    if !merged.failures.is_empty() {
        offer_to_exclude_failures(&root, &mut settings, &merged, yes, &output)?;
    }
    bail!("scan found issues")
}

/// Offer to record the failing files as exclusions in `.hooksmith.yaml`
/// so intentional content stops tripping future scans.
fn offer_to_exclude_failures(
    root: &std::path::Path,
    settings: &mut Settings,
    merged: &ScanResult,
    always_yes: bool,
    output: &Output,
) -> Result<()> {
    let confirmed = always_yes
        || output.confirm(
            "Add the failing files to the scan exclusions in .hooksmith.yaml?",
            false,
        );
    if !confirmed {
        return Ok(());
    }

    let mut changed = false;
    for failure in &merged.failures {
        if !settings
            .repo_files
            .exclude_file_patterns
            .contains(&failure.file)
        {
            settings
                .repo_files
                .exclude_file_patterns
                .push(failure.file.clone());
            changed = true;
        }
    }
    if changed {
        settings.save(root)?;
        output.success("Updated .hooksmith.yaml with new exclusions.");
    }
    Ok(())
}
