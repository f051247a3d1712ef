//! Line-oriented terminal front end for the registration flow
//!
//! Reads commands from stdin and scheduler wake-ups from the tokio
//! scheduler on the same task, so the flow is only ever touched from one
//! place.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use citi_core::domain::Step;
use citi_core::errors::FlowError;
use citi_core::services::{FlowEvent, RegistrationFlow, TaskScheduler, VerificationPhase};
use citi_infra::{InfrastructureServices, TokioScheduler};
use citi_shared::config::AppConfig;
use citi_shared::utils::phone::format_uk_display;

use crate::command::{Command, HELP};

pub async fn run(config: &AppConfig, services: InfrastructureServices) -> anyhow::Result<()> {
    let (mut scheduler, mut wakeups) = TokioScheduler::new();
    let mut flow = RegistrationFlow::new(config, services.collaborators());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Welcome to CiTiApp. Type `help` for commands.");
    render(&flow);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&mut flow, &mut scheduler, command),
                    Err(e) => println!("{}", e),
                }
            }
            Some(id) = wakeups.recv() => {
                if let Some(event) = flow.handle_wakeup(id, &mut scheduler) {
                    if is_silent(&event) {
                        continue;
                    }
                    report(&flow, &event);
                }
            }
        }
    }

    flow.abandon(&mut scheduler);
    info!("Console closed");
    Ok(())
}

fn execute(flow: &mut RegistrationFlow, scheduler: &mut dyn TaskScheduler, command: Command) {
    debug!(command = ?command, "Console command");
    let result = match command {
        Command::Signup(method) => flow.choose_signup_method(method),
        Command::Set(field) => flow.update_field(field).map(|()| FlowEvent::Navigated {
            step: flow.current_step(),
        }),
        Command::Next => flow.continue_from_current(scheduler),
        Command::Back => {
            if !flow.go_back(scheduler) {
                println!("Nothing to go back to.");
            }
            Ok(FlowEvent::Navigated {
                step: flow.current_step(),
            })
        }
        Command::Code(digits) => flow
            .push_code_digits(&digits, scheduler)
            .map(FlowEvent::Verification),
        Command::ClearCode => flow.input_code("", scheduler).map(FlowEvent::Verification),
        Command::Resend => flow.resend_code(scheduler).map(FlowEvent::Verification),
        Command::EditPhone => flow.edit_phone_number(scheduler),
        Command::Status => Ok(FlowEvent::Navigated {
            step: flow.current_step(),
        }),
        Command::Abandon => Ok(flow.abandon(scheduler)),
        Command::Help => {
            println!("{}", HELP);
            return;
        }
        Command::Quit => return,
    };

    match result {
        Ok(event) => report(flow, &event),
        Err(e) => report_error(&e),
    }
}

/// Countdown ticks that changed nothing worth printing
fn is_silent(event: &FlowEvent) -> bool {
    matches!(
        event,
        FlowEvent::Verification(outcome)
            if outcome.error.is_none() && outcome.completed.is_none()
    )
}

fn report(flow: &RegistrationFlow, event: &FlowEvent) {
    match event {
        FlowEvent::Navigated { .. } | FlowEvent::CodeSent { .. } | FlowEvent::Abandoned => {
            render(flow)
        }
        FlowEvent::SendingCode => println!("Sending..."),
        FlowEvent::Verification(outcome) => {
            if let Some(error) = &outcome.error {
                println!("! {}", error);
            }
            if outcome.completed.is_some() {
                println!("Account Activated!");
                render(flow);
            } else if outcome.phase == VerificationPhase::Submitting {
                println!("Verifying...");
            } else {
                render(flow);
            }
        }
        FlowEvent::CreatingAccount => println!("Creating Account..."),
        FlowEvent::AccountCreated => println!("Account created. Redirecting to home..."),
        FlowEvent::RedirectHome => {
            println!("Welcome to CiTiApp!");
            render(flow);
        }
    }
}

fn report_error(error: &FlowError) {
    println!("! {}", error);
    if let FlowError::Validation { errors, .. } = error {
        for field_error in errors {
            println!("  - {}", field_error);
        }
    }
}

fn title(step: Step) -> &'static str {
    match step {
        Step::Signup => "Create your account",
        Step::NameEmail => "Your details",
        Step::GenderAge => "About you",
        Step::Phone => "Your phone number",
        Step::VerifyCode => "Verify your number",
        Step::Finalize => "Almost done",
    }
}

fn render(flow: &RegistrationFlow) {
    let step = flow.current_step();
    match step.progress() {
        Some((position, total)) => {
            println!("\n== {} (step {} of {}) ==", title(step), position, total)
        }
        None => println!("\n== {} ==", title(step)),
    }

    let record = flow.record();
    match step {
        Step::Signup => println!("Sign up with: signup google | signup apple | signup form"),
        Step::NameEmail => {
            println!("First name: {}", record.first_name);
            println!("Last name:  {}", record.last_name);
            println!("Email:      {}", record.email);
            println!("Postcode:   {}", record.postcode);
        }
        Step::GenderAge => {
            let gender = record.gender.as_ref().map(|g| g.label()).unwrap_or("-");
            let age = record.age_band.map(|a| a.label()).unwrap_or("-");
            println!("Gender:    {}", gender);
            println!("Age range: {}", age);
        }
        Step::Phone => println!("Phone: {}", format_uk_display(&record.phone_number)),
        Step::VerifyCode => match flow.verification() {
            Some(controller) => {
                let session = controller.session();
                println!("{}", session.prompt());
                println!("{}", code_boxes(session.entered_code(), session.code_length()));
                println!("{}", session.status_hint());
                println!("{}", session.resend_hint());
            }
            None => println!("No code has been sent."),
        },
        Step::Finalize => {
            println!("{} {} <{}>", record.first_name, record.last_name, record.email);
            println!("Phone: {} (verified)", format_uk_display(&record.phone_number));
            println!("Type `next` to create your account.");
        }
    }

    if matches!(step, Step::NameEmail | Step::GenderAge | Step::Phone) && !flow.can_continue() {
        println!("(fill in every field to continue)");
    }
}

/// Six boxes, filled from the left
fn code_boxes(entered: &str, length: usize) -> String {
    let mut digits = entered.chars();
    (0..length)
        .map(|_| match digits.next() {
            Some(digit) => format!("[{}]", digit),
            None => String::from("[ ]"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
