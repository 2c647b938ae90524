//! Terminal front end driving the screen flows.
//!
//! Each invocation restores the session from client storage, runs one
//! command through the route guard and the matching screen, and prints the
//! result. Consultations live in memory, so every run starts from the
//! remote's seed dataset.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::domain::{ConsultationForm, ConsultationId, FieldErrors, User};
use crate::inbound::guard::{GuardDecision, RouteGuard};
use crate::inbound::routes::Route;
use crate::inbound::screens::{
    self, DELETE_CONFIRMATION, DashboardView, DeleteOutcome, EditScreen, FormOutcome,
    LOADING_MESSAGE, LoginOutcome,
};
use crate::inbound::state::AppState;

/// `conectahc` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "conectahc",
    about = "Schedule and track medical consultations from the terminal",
    version
)]
pub struct CliArgs {
    /// Directory holding the client storage file.
    #[arg(long = "storage", value_name = "dir", global = true)]
    pub storage_dir: Option<PathBuf>,
    /// Simulated remote latency in milliseconds.
    #[arg(long = "latency-ms", value_name = "ms", global = true)]
    pub latency_ms: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

/// Screen-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Navigate to a path and report what the guard decides.
    Open { path: String },
    /// Show metrics and the consultation table.
    Dashboard,
    /// Book a consultation.
    Add(FormArgs),
    /// Change an existing consultation; omitted fields keep their value.
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete a consultation.
    Delete {
        id: String,
        /// Accept the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Field values for a new consultation.
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    #[arg(long = "patient-id", default_value = "")]
    pub patient_id: String,
    #[arg(long = "patient-name", default_value = "")]
    pub patient_name: String,
    #[arg(long = "type", default_value = "")]
    pub kind: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Duration in minutes.
    #[arg(long, default_value = "")]
    pub duration: String,
    /// Date as YYYY-MM-DD.
    #[arg(long, default_value = "")]
    pub date: String,
    /// scheduled, completed or cancelled.
    #[arg(long, default_value = "scheduled")]
    pub status: String,
}

impl From<FormArgs> for ConsultationForm {
    fn from(args: FormArgs) -> Self {
        Self {
            patient_id: args.patient_id,
            patient_name: args.patient_name,
            kind: args.kind,
            description: args.description,
            duration: args.duration,
            date: args.date,
            status: args.status,
        }
    }
}

/// Field overrides for an edit.
#[derive(Debug, Clone, Default, Args)]
pub struct EditArgs {
    #[arg(long = "patient-id")]
    pub patient_id: Option<String>,
    #[arg(long = "patient-name")]
    pub patient_name: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

impl EditArgs {
    fn apply(self, form: &mut ConsultationForm) {
        let overrides = [
            (self.patient_id, &mut form.patient_id),
            (self.patient_name, &mut form.patient_name),
            (self.kind, &mut form.kind),
            (self.description, &mut form.description),
            (self.duration, &mut form.duration),
            (self.date, &mut form.date),
            (self.status, &mut form.status),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Whether the command achieved what was asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}

impl CommandStatus {
    fn from_success(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Run `command` against `state`, writing human-readable output to `out`.
pub async fn run(
    state: &AppState,
    command: Command,
    out: &mut impl Write,
) -> io::Result<CommandStatus> {
    let restored = state.session.restore();
    debug!(?restored, "session restore finished");
    let guard = RouteGuard::new(state.session.clone());

    match command {
        Command::Login { email, password } => login(state, &email, &password, out).await,
        Command::Logout => {
            let next = screens::logout(state);
            writeln!(out, "Sessão encerrada. Próxima tela: {next}")?;
            Ok(CommandStatus::Success)
        }
        Command::Whoami => whoami(state.session.current_user(), out),
        Command::Open { path } => open(state, &guard, &path, out).await,
        Command::Dashboard => {
            if !admit(&guard, Route::Dashboard, out)? {
                return Ok(CommandStatus::Failure);
            }
            state.consultations.fetch().await;
            render_dashboard(state, out)
        }
        Command::Add(fields) => {
            if !admit(&guard, Route::AddConsultation, out)? {
                return Ok(CommandStatus::Failure);
            }
            state.consultations.fetch().await;
            let outcome = screens::submit_new(state, &fields.into()).await;
            report_form(state, outcome, out)
        }
        Command::Edit { id, fields } => edit(state, &guard, &id, fields, out).await,
        Command::Delete { id, yes } => delete(state, &guard, &id, yes, out).await,
    }
}

async fn login(
    state: &AppState,
    email: &str,
    password: &str,
    out: &mut impl Write,
) -> io::Result<CommandStatus> {
    match screens::submit_login(state, email, password).await {
        LoginOutcome::Authenticated { user, redirect } => {
            writeln!(out, "Bem-vindo, {}! Próxima tela: {redirect}", user.name())?;
            Ok(CommandStatus::Success)
        }
        LoginOutcome::Invalid(error) => {
            writeln!(out, "{}: {error}", error.field())?;
            Ok(CommandStatus::Failure)
        }
        LoginOutcome::Rejected { message } => {
            writeln!(out, "{message}")?;
            Ok(CommandStatus::Failure)
        }
    }
}

fn whoami(user: Option<User>, out: &mut impl Write) -> io::Result<CommandStatus> {
    match user {
        Some(user) => {
            writeln!(
                out,
                "{} <{}> ({}, id {})",
                user.name(),
                user.email(),
                user.role(),
                user.id()
            )?;
            Ok(CommandStatus::Success)
        }
        None => {
            writeln!(out, "Nenhuma sessão ativa")?;
            Ok(CommandStatus::Failure)
        }
    }
}

async fn open(
    state: &AppState,
    guard: &RouteGuard,
    path: &str,
    out: &mut impl Write,
) -> io::Result<CommandStatus> {
    match guard.navigate(path) {
        GuardDecision::Loading => {
            writeln!(out, "{LOADING_MESSAGE}")?;
            Ok(CommandStatus::Success)
        }
        GuardDecision::Redirect(target) => {
            writeln!(out, "Redirecionando para {target}")?;
            Ok(CommandStatus::Failure)
        }
        GuardDecision::Render(Route::Dashboard) => {
            state.consultations.fetch().await;
            render_dashboard(state, out)
        }
        GuardDecision::Render(Route::EditConsultation(id)) => {
            state.consultations.fetch().await;
            match screens::load_edit(state, &id) {
                EditScreen::Prefilled { form, .. } => {
                    writeln!(out, "{}", Route::EditConsultation(id).title())?;
                    render_form(&form, out)?;
                    Ok(CommandStatus::Success)
                }
                EditScreen::Redirect(target) => {
                    writeln!(out, "Redirecionando para {target}")?;
                    Ok(CommandStatus::Failure)
                }
            }
        }
        GuardDecision::Render(route) => {
            writeln!(out, "{}", route.title())?;
            Ok(CommandStatus::from_success(route != Route::NotFound))
        }
    }
}

async fn edit(
    state: &AppState,
    guard: &RouteGuard,
    raw_id: &str,
    fields: EditArgs,
    out: &mut impl Write,
) -> io::Result<CommandStatus> {
    let Some(id) = parse_id(raw_id, out)? else {
        return Ok(CommandStatus::Failure);
    };
    if !admit(guard, Route::EditConsultation(id.clone()), out)? {
        return Ok(CommandStatus::Failure);
    }
    state.consultations.fetch().await;

    let mut form = match screens::load_edit(state, &id) {
        EditScreen::Prefilled { form, .. } => form,
        EditScreen::Redirect(target) => {
            writeln!(out, "Consulta {id} não encontrada. Redirecionando para {target}")?;
            return Ok(CommandStatus::Failure);
        }
    };
    fields.apply(&mut form);
    let outcome = screens::submit_edit(state, &id, &form).await;
    report_form(state, outcome, out)
}

async fn delete(
    state: &AppState,
    guard: &RouteGuard,
    raw_id: &str,
    confirmed: bool,
    out: &mut impl Write,
) -> io::Result<CommandStatus> {
    let Some(id) = parse_id(raw_id, out)? else {
        return Ok(CommandStatus::Failure);
    };
    if !admit(guard, Route::Dashboard, out)? {
        return Ok(CommandStatus::Failure);
    }
    state.consultations.fetch().await;

    match screens::delete_consultation(state, &id, confirmed).await {
        DeleteOutcome::Cancelled => {
            writeln!(out, "{DELETE_CONFIRMATION} (use --yes para confirmar)")?;
            Ok(CommandStatus::Failure)
        }
        DeleteOutcome::Deleted => render_dashboard(state, out),
        DeleteOutcome::Failed { message } => {
            writeln!(out, "{message}")?;
            Ok(CommandStatus::Failure)
        }
    }
}

fn admit(guard: &RouteGuard, route: Route, out: &mut impl Write) -> io::Result<bool> {
    match guard.decide(route) {
        GuardDecision::Render(_) => Ok(true),
        GuardDecision::Redirect(target) => {
            writeln!(out, "Faça login para continuar. Redirecionando para {target}")?;
            Ok(false)
        }
        GuardDecision::Loading => {
            writeln!(out, "{LOADING_MESSAGE}")?;
            Ok(false)
        }
    }
}

fn parse_id(raw: &str, out: &mut impl Write) -> io::Result<Option<ConsultationId>> {
    match ConsultationId::new(raw) {
        Ok(id) => Ok(Some(id)),
        Err(error) => {
            writeln!(out, "Identificador inválido: {error}")?;
            Ok(None)
        }
    }
}

fn report_form(
    state: &AppState,
    outcome: FormOutcome,
    out: &mut impl Write,
) -> io::Result<CommandStatus> {
    match outcome {
        FormOutcome::Saved(_) => render_dashboard(state, out),
        FormOutcome::Invalid(errors) => {
            render_field_errors(&errors, out)?;
            Ok(CommandStatus::Failure)
        }
        FormOutcome::Failed { message } => {
            writeln!(out, "{message}")?;
            Ok(CommandStatus::Failure)
        }
    }
}

fn render_field_errors(errors: &FieldErrors, out: &mut impl Write) -> io::Result<()> {
    for (field, message) in errors.iter() {
        writeln!(out, "{}: {message}", field.as_str())?;
    }
    Ok(())
}

fn render_form(form: &ConsultationForm, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  patientId:   {}", form.patient_id)?;
    writeln!(out, "  patientName: {}", form.patient_name)?;
    writeln!(out, "  type:        {}", form.kind)?;
    writeln!(out, "  description: {}", form.description)?;
    writeln!(out, "  duration:    {}", form.duration)?;
    writeln!(out, "  date:        {}", form.date)?;
    writeln!(out, "  status:      {}", form.status)
}

fn render_dashboard(state: &AppState, out: &mut impl Write) -> io::Result<CommandStatus> {
    let page = match screens::dashboard_view(state) {
        DashboardView::Loading => {
            writeln!(out, "{LOADING_MESSAGE}")?;
            return Ok(CommandStatus::Success);
        }
        DashboardView::Ready(page) => page,
    };

    writeln!(out, "{}", Route::Dashboard.title())?;
    if let Some(greeting) = &page.greeting {
        writeln!(out, "{greeting}")?;
    }
    if let Some(error) = &page.error {
        writeln!(out, "! {error}")?;
    }
    let metrics = page.metrics;
    writeln!(out, "Total de Consultas:   {}", metrics.total_consultations)?;
    writeln!(out, "Consultas Concluídas: {}", metrics.completed_consultations)?;
    writeln!(out, "Consultas Canceladas: {}", metrics.cancelled_consultations)?;
    writeln!(out, "Tempo Total (min):    {}", metrics.total_duration)?;
    writeln!(out, "Taxa de Adesão:       {}", page.attendance)?;
    writeln!(out)?;

    if let Some(placeholder) = page.placeholder {
        writeln!(out, "{placeholder}")?;
    }
    for row in &page.rows {
        writeln!(
            out,
            "[{}] {} | {} | {} | {} | {}",
            row.id, row.kind, row.description, row.date, row.duration, row.status
        )?;
    }
    Ok(CommandStatus::Success)
}
