//! Sign-up form example.
//!
//! Handles a few requests against one shared form definition and prints
//! what each produced. Pass `--verbose` for debug logs.

use std::sync::Arc;

use oxide_bind::fields::{email_field, password_field, BooleanField, ChoiceField, StringField};
use oxide_bind::validators::{LengthRangeValidator, RegexValidator};
use oxide_bind::{BoundForm, Form, FormIssue, Handlers, Request};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn signup_form() -> Result<Form, regex::Error> {
    Ok(Form::builder()
        .field(
            "username",
            StringField::new()
                .required()
                .validator(LengthRangeValidator::new(3, 20))
                .validator(RegexValidator::with_message(
                    r"^[a-z0-9_]+$",
                    "use lowercase letters, digits and underscores",
                )?),
        )
        .field("email", email_field(true))
        .field("password", password_field(Some(8)))
        .field("confirm", password_field(None))
        .field(
            "plan",
            ChoiceField::new([("free", "Free"), ("pro", "Pro")]).required(),
        )
        .field("terms", BooleanField::new().required())
        .validate(|form: &BoundForm| -> Result<(), FormIssue> {
            if form.value("password") == form.value("confirm") {
                Ok(())
            } else {
                Err(FormIssue::field("confirm", "passwords do not match"))
            }
        })
        .build())
}

fn report(label: &str) -> Handlers<'_> {
    Handlers::new()
        .on_empty(move |form| {
            println!("{label}: nothing submitted, render {} fields", form.field_names().count());
        })
        .on_success(move |bound| {
            println!("{label}: welcome {}", bound.value("username").unwrap_or(&json!(null)));
        })
        .on_error(move |bound| {
            println!("{label}: rejected");
            for (field, messages) in &bound.field_errors().errors {
                println!("  {field}: {}", messages.join(", "));
            }
            for message in bound.errors() {
                println!("  {message}");
            }
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let verbose = std::env::args().any(|arg| arg == "--verbose" || arg == "-v");
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let form = Arc::new(signup_form()?);
    info!(fields = form.field_names().count(), "sign-up form ready");

    form.handle(None::<serde_json::Value>, report("empty")).await?;

    form.handle(Request::get("/signup?username=Ada%20L&plan=gold"), report("query"))
        .await?;

    let body = "username=ada_l&email=ada%40example.com&password=analytical\
                &confirm=analytical&plan=pro&terms=on";
    let request = Request::post("/signup")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .chunks(body.as_bytes().chunks(16).map(<[u8]>::to_vec));
    form.handle(request, report("post")).await?;

    let request = Request::post("/signup")
        .header("Content-Type", "application/json")
        .body(
            json!({
                "username": "babbage",
                "email": "charles@example.com",
                "password": "difference",
                "confirm": "engine",
                "plan": "free",
                "terms": true,
            })
            .to_string(),
        );
    form.handle(request, report("json")).await?;

    let tasks: Vec<_> = ["grace", "alan"]
        .into_iter()
        .map(|name| {
            let form = Arc::clone(&form);
            tokio::spawn(async move {
                let data = json!({
                    "username": name,
                    "email": format!("{name}@example.com"),
                    "password": "hunter22",
                    "confirm": "hunter22",
                    "plan": "free",
                    "terms": "yes",
                });
                form.handle(data, report(name)).await
            })
        })
        .collect();
    for task in tasks {
        task.await??;
    }

    if let Err(err) = form.handle(Request::delete("/signup"), report("delete")).await {
        println!("delete: {err}");
    }

    Ok(())
}
