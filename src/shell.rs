//! Interactive shell driving the session command surface.
//!
//! One command per input line, executed to completion before the next line
//! is read. This is the presentation layer from the engine's point of view:
//! it owns stdin/stdout, maps engine results to notices and envelopes, and
//! keeps no state of its own beyond the [`Session`].

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::{json, Value as JsonValue};

use crate::core::error::FieldbookError;
use crate::core::model::{
    Conclusion, ConclusionRating, EvidenceFile, Finding, FindingType, RiskRating, WorkpaperRecord,
};
use crate::core::notify::NoticeLevel;
use crate::core::{seed, time};
use crate::engine::evidence;
use crate::engine::session::Session;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum RatingArg {
    Effective,
    Ineffective,
    NeedsImprovement,
}

impl From<RatingArg> for ConclusionRating {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Effective => ConclusionRating::Effective,
            RatingArg::Ineffective => ConclusionRating::Ineffective,
            RatingArg::NeedsImprovement => ConclusionRating::NeedsImprovement,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum RiskArg {
    High,
    Medium,
    Low,
}

impl From<RiskArg> for RiskRating {
    fn from(arg: RiskArg) -> Self {
        match arg {
            RiskArg::High => RiskRating::High,
            RiskArg::Medium => RiskRating::Medium,
            RiskArg::Low => RiskRating::Low,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum FindingTypeArg {
    Finding,
    Improvement,
}

impl From<FindingTypeArg> for FindingType {
    fn from(arg: FindingTypeArg) -> Self {
        match arg {
            FindingTypeArg::Finding => FindingType::Finding,
            FindingTypeArg::Improvement => FindingType::Improvement,
        }
    }
}

/// One shell input line, parsed with clap.
#[derive(Parser, Debug)]
#[clap(name = "fieldbook", no_binary_name = true, disable_help_flag = true)]
struct ShellLine {
    #[clap(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// List the engagement collection.
    Engagements,
    /// Select an engagement and initialize its program on first access.
    Select {
        #[clap(long)]
        id: String,
    },
    /// Show the current program.
    Program,
    /// Show one workpaper in full.
    Show {
        #[clap(long)]
        wp: u32,
    },
    /// Mark a workpaper as work-in-progress.
    SaveDraft {
        #[clap(long)]
        wp: u32,
    },
    /// Conclude a workpaper; Ineffective fails it, anything else passes.
    MarkComplete {
        #[clap(long)]
        wp: u32,
        #[clap(long, value_enum, default_value = "effective")]
        rating: RatingArg,
        #[clap(long, default_value = "")]
        summary: String,
    },
    /// Record the auditor's observations for a workpaper.
    Narrative {
        #[clap(long)]
        wp: u32,
        #[clap(long)]
        text: String,
    },
    /// Procedure list editing.
    Procedure {
        #[clap(subcommand)]
        command: ProcedureCommand,
    },
    /// Required/uploaded evidence tracking.
    Evidence {
        #[clap(subcommand)]
        command: EvidenceCommand,
    },
    /// Program shape: add, delete, move.
    Workpaper {
        #[clap(subcommand)]
        command: WorkpaperCommand,
    },
    /// Two-phase drag gesture.
    Drag {
        #[clap(subcommand)]
        command: DragCommand,
    },
    /// Raise a finding against a workpaper.
    Finding {
        #[clap(subcommand)]
        command: FindingCommand,
    },
    /// List findings for the engagement, or those linked to one workpaper.
    Findings {
        #[clap(long)]
        wp: Option<u32>,
    },
    /// Show notices still within their TTL.
    Notices,
    /// Leave the shell.
    Quit,
}

#[derive(Subcommand, Debug)]
enum ProcedureCommand {
    Add {
        #[clap(long)]
        wp: u32,
    },
    Edit {
        #[clap(long)]
        wp: u32,
        #[clap(long)]
        id: String,
        #[clap(long)]
        text: String,
    },
    Toggle {
        #[clap(long)]
        wp: u32,
        #[clap(long)]
        id: String,
    },
    Delete {
        #[clap(long)]
        wp: u32,
        #[clap(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum EvidenceCommand {
    /// Add a required-evidence label.
    Require {
        #[clap(long)]
        wp: u32,
        #[clap(long)]
        label: String,
    },
    /// Remove a required-evidence entry by position.
    Remove {
        #[clap(long)]
        wp: u32,
        #[clap(long)]
        index: usize,
    },
    /// Record uploaded file metadata (name, size, mime type).
    Upload {
        #[clap(long)]
        wp: u32,
        #[clap(long = "file", required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum WorkpaperCommand {
    Add,
    Delete {
        #[clap(long)]
        wp: u32,
        /// Confirm intent; deletion is immediate and irreversible.
        #[clap(long)]
        yes: bool,
    },
    Move {
        #[clap(long)]
        from: usize,
        #[clap(long)]
        to: usize,
    },
}

#[derive(Subcommand, Debug)]
enum DragCommand {
    Pick {
        #[clap(long)]
        index: usize,
    },
    Drop {
        #[clap(long)]
        index: usize,
    },
    Abort,
}

#[derive(Subcommand, Debug)]
enum FindingCommand {
    Raise {
        #[clap(long)]
        wp: u32,
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        description: String,
        #[clap(long, value_enum, default_value = "medium")]
        risk: RiskArg,
        #[clap(long = "type", value_enum, default_value = "finding")]
        kind: FindingTypeArg,
        #[clap(long, default_value = "")]
        root_cause: String,
        #[clap(long, default_value = "")]
        impact: String,
        #[clap(long, default_value = "")]
        recommendation: String,
    },
}

pub struct Shell {
    session: Session,
    format: OutputFormat,
}

impl Shell {
    pub fn new(session: Session, format: OutputFormat) -> Self {
        Shell { session, format }
    }

    /// Build a session from optional catalog files, falling back to the
    /// built-in demo catalog.
    pub fn load(
        engagements_path: Option<&Path>,
        templates_path: Option<&Path>,
        format: OutputFormat,
    ) -> Result<Self, FieldbookError> {
        let engagements = match engagements_path {
            Some(path) => read_catalog(path)?,
            None => seed::demo_engagements(),
        };
        let templates = match templates_path {
            Some(path) => read_catalog(path)?,
            None => seed::demo_templates(),
        };
        Ok(Shell::new(Session::new(engagements, templates), format))
    }

    /// Read command lines until EOF or `quit`.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let tokens = tokenize(trimmed);
            let parsed = match ShellLine::try_parse_from(tokens) {
                Ok(parsed) => parsed,
                Err(err) => {
                    self.emit(&mut output, "parse", Err(err.to_string()), false)?;
                    continue;
                }
            };
            if matches!(parsed.command, ShellCommand::Quit) {
                break;
            }
            let cmd = command_name(&parsed.command);
            let notices_before = self.session.notices.len();
            let result = self.dispatch(parsed.command).map_err(|e| e.to_string());
            let noticed = self.session.notices.len() > notices_before;
            self.emit(&mut output, cmd, result, noticed)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, command: ShellCommand) -> Result<JsonValue, FieldbookError> {
        match command {
            ShellCommand::Engagements => Ok(json!({
                "engagements": self.session.engagements(),
            })),
            ShellCommand::Select { id } => {
                let program = self.session.select_engagement(&id)?;
                Ok(json!({ "engagement": id, "program": program_summary(&program) }))
            }
            ShellCommand::Program => {
                let program = self.session.program()?;
                Ok(json!({ "program": program_summary(&program) }))
            }
            ShellCommand::Show { wp } => {
                let record = self.session.workpaper(wp)?;
                Ok(json!({ "workpaper": record }))
            }
            ShellCommand::SaveDraft { wp } => {
                self.session.save_draft(wp)?;
                Ok(json!({ "workpaper": wp, "status": "wip" }))
            }
            ShellCommand::MarkComplete { wp, rating, summary } => {
                let status = self.session.mark_complete(
                    wp,
                    Conclusion {
                        rating: rating.into(),
                        summary,
                    },
                )?;
                Ok(json!({ "workpaper": wp, "status": status }))
            }
            ShellCommand::Narrative { wp, text } => {
                self.session.set_narrative(wp, &text)?;
                Ok(json!({ "workpaper": wp }))
            }
            ShellCommand::Procedure { command } => self.dispatch_procedure(command),
            ShellCommand::Evidence { command } => self.dispatch_evidence(command),
            ShellCommand::Workpaper { command } => self.dispatch_workpaper(command),
            ShellCommand::Drag { command } => self.dispatch_drag(command),
            ShellCommand::Finding { command } => self.dispatch_finding(command),
            ShellCommand::Findings { wp } => {
                let findings = match wp {
                    Some(wp) => self.session.linked_findings(wp)?,
                    None => self.session.engagement_findings()?,
                };
                Ok(json!({ "findings": findings_summary(&findings) }))
            }
            ShellCommand::Notices => {
                let now = time::now_unix_secs();
                let active: Vec<_> = self.session.notices.active(now).into_iter().collect();
                Ok(json!({ "notices": active }))
            }
            ShellCommand::Quit => unreachable!("handled by the read loop"),
        }
    }

    fn dispatch_procedure(&mut self, command: ProcedureCommand) -> Result<JsonValue, FieldbookError> {
        match command {
            ProcedureCommand::Add { wp } => {
                let id = self.session.add_procedure(wp)?;
                Ok(json!({ "workpaper": wp, "procedure": id }))
            }
            ProcedureCommand::Edit { wp, id, text } => {
                self.session.edit_procedure_text(wp, &id, &text)?;
                Ok(json!({ "workpaper": wp, "procedure": id }))
            }
            ProcedureCommand::Toggle { wp, id } => {
                let completed = self.session.toggle_procedure(wp, &id)?;
                Ok(json!({ "workpaper": wp, "procedure": id, "completed": completed }))
            }
            ProcedureCommand::Delete { wp, id } => {
                self.session.delete_procedure(wp, &id)?;
                Ok(json!({ "workpaper": wp, "procedure": id }))
            }
        }
    }

    fn dispatch_evidence(&mut self, command: EvidenceCommand) -> Result<JsonValue, FieldbookError> {
        match command {
            EvidenceCommand::Require { wp, label } => {
                self.session.add_required_evidence(wp, &label)?;
                Ok(json!({ "workpaper": wp, "label": label }))
            }
            EvidenceCommand::Remove { wp, index } => {
                let removed = self.session.remove_required_evidence(wp, index)?;
                Ok(json!({ "workpaper": wp, "removed": removed }))
            }
            EvidenceCommand::Upload { wp, files } => {
                let descriptors = files
                    .iter()
                    .map(|path| describe_file(path))
                    .collect::<Result<Vec<_>, _>>()?;
                let count = self.session.record_uploaded_evidence(wp, descriptors)?;
                Ok(json!({ "workpaper": wp, "uploaded": count }))
            }
        }
    }

    fn dispatch_workpaper(&mut self, command: WorkpaperCommand) -> Result<JsonValue, FieldbookError> {
        match command {
            WorkpaperCommand::Add => {
                let wp = self.session.add_workpaper()?;
                Ok(json!({ "workpaper": wp.id, "reference": wp.reference }))
            }
            WorkpaperCommand::Delete { wp, yes } => {
                self.session.delete_workpaper(wp, yes)?;
                Ok(json!({ "workpaper": wp, "deleted": true }))
            }
            WorkpaperCommand::Move { from, to } => {
                self.session.move_workpaper(from, to)?;
                Ok(json!({ "from": from, "to": to }))
            }
        }
    }

    fn dispatch_drag(&mut self, command: DragCommand) -> Result<JsonValue, FieldbookError> {
        match command {
            DragCommand::Pick { index } => {
                self.session.pick_up(index)?;
                Ok(json!({ "picked": index }))
            }
            DragCommand::Drop { index } => {
                let moved = self.session.drop_on(index)?;
                Ok(json!({ "dropped": index, "moved": moved }))
            }
            DragCommand::Abort => {
                self.session.abort_drag();
                Ok(json!({ "aborted": true }))
            }
        }
    }

    fn dispatch_finding(&mut self, command: FindingCommand) -> Result<JsonValue, FieldbookError> {
        match command {
            FindingCommand::Raise {
                wp,
                title,
                description,
                risk,
                kind,
                root_cause,
                impact,
                recommendation,
            } => {
                let mut draft = self.session.open_finding_draft(wp)?;
                draft.title = title;
                draft.description = description;
                draft.risk = risk.into();
                draft.kind = kind.into();
                draft.root_cause = root_cause;
                draft.impact = impact;
                draft.recommendation = recommendation;
                let finding = self.session.commit_finding(wp, draft)?;
                Ok(json!({
                    "finding": finding.id,
                    "linked_control": finding.linked_control,
                }))
            }
        }
    }

    fn emit(
        &mut self,
        output: &mut impl Write,
        cmd: &str,
        result: Result<JsonValue, String>,
        noticed: bool,
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let envelope = match result {
                    Ok(payload) => json!({
                        "ts": time::now_epoch_z(),
                        "cmd": cmd,
                        "status": "ok",
                        "payload": payload,
                    }),
                    Err(message) => json!({
                        "ts": time::now_epoch_z(),
                        "cmd": cmd,
                        "status": "error",
                        "error": message,
                    }),
                };
                writeln!(output, "{}", envelope)
            }
            OutputFormat::Text => match result {
                Ok(payload) => {
                    let line = match self.session.notices.latest() {
                        Some(notice) if noticed && notice.level == NoticeLevel::Success => {
                            format!("{} {}", "✓".green(), notice.message)
                        }
                        _ => format!("{} {}", "▸".cyan(), compact_payload(&payload)),
                    };
                    writeln!(output, "{}", line)
                }
                Err(message) => writeln!(output, "{} {}", "✗".red(), message.red()),
            },
        }
    }
}

fn command_name(command: &ShellCommand) -> &'static str {
    match command {
        ShellCommand::Engagements => "engagements",
        ShellCommand::Select { .. } => "select",
        ShellCommand::Program => "program",
        ShellCommand::Show { .. } => "show",
        ShellCommand::SaveDraft { .. } => "save-draft",
        ShellCommand::MarkComplete { .. } => "mark-complete",
        ShellCommand::Narrative { .. } => "narrative",
        ShellCommand::Procedure { .. } => "procedure",
        ShellCommand::Evidence { .. } => "evidence",
        ShellCommand::Workpaper { .. } => "workpaper",
        ShellCommand::Drag { .. } => "drag",
        ShellCommand::Finding { .. } => "finding",
        ShellCommand::Findings { .. } => "findings",
        ShellCommand::Notices => "notices",
        ShellCommand::Quit => "quit",
    }
}

fn program_summary(program: &[WorkpaperRecord]) -> Vec<JsonValue> {
    program
        .iter()
        .map(|wp| {
            json!({
                "id": wp.id,
                "reference": wp.reference,
                "title": wp.title,
                "status": wp.status,
            })
        })
        .collect()
}

fn findings_summary(findings: &[Finding]) -> Vec<JsonValue> {
    findings
        .iter()
        .map(|f| {
            json!({
                "id": f.id,
                "title": f.title,
                "risk": f.risk_rating,
                "linked_control": f.linked_control,
                "status": f.status,
            })
        })
        .collect()
}

fn compact_payload(payload: &JsonValue) -> String {
    let rendered = payload.to_string();
    let mut chars = rendered.chars();
    let preview: String = chars.by_ref().take(120).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Capture evidence-file metadata: name, human size, mime type by extension.
fn describe_file(path: &Path) -> Result<EvidenceFile, FieldbookError> {
    let metadata = fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(EvidenceFile {
        name,
        size_display: evidence::display_size(metadata.len()),
        mime_type: mime_for(path),
    })
}

fn mime_for(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "xls" | "xlsx" => "application/vnd.ms-excel",
        "doc" | "docx" => "application/msword",
        "csv" => "text/csv",
        "txt" | "log" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Parse a JSON catalog file into the expected collection type.
fn read_catalog<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, FieldbookError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| FieldbookError::CatalogError(format!("{}: {}", path.display(), e)))
}

/// Quote-aware whitespace tokenizer for shell input lines.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
