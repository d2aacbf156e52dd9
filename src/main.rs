//! form-layout - demo driver for the form layout engine
//!
//! Builds, stores and projects forms through the file store configured in
//! the user's [`BuilderConfig`].

use anyhow::{Context, Result};
use form_layout::state::SelectOption;
use form_layout::{
    project, BuilderConfig, FieldAttributes, FieldPatch, FileStore, FormBuilder, PagePatch, Side,
    StoredId,
};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: form-layout <demo | schema <id> | list>";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_layout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = BuilderConfig::load().context("Failed to load configuration")?;
    let mut store = FileStore::new(config.store_path());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["demo"] => demo(&config, &mut store).await,
        ["schema", id] => schema(&config, &mut store, id).await,
        ["list"] => list(&store).await,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Build a two-page registration form and save it
async fn demo(config: &BuilderConfig, store: &mut FileStore) -> Result<()> {
    let mut builder = FormBuilder::new(config.context());
    builder.set_form_name("Summer Camp Registration");

    let first_page = builder.document().current_page_id().clone();
    builder.update_page(
        &first_page,
        PagePatch {
            title: Some("Camper".to_string()),
            ..Default::default()
        },
    )?;
    let first = builder.add_field("text", None)?;
    builder.update_field(&first, labelled("First name", true))?;
    let last = builder.add_field_to_row("text", 0, Side::Right, Some(&first))?;
    builder.update_field(&last, labelled("Last name", true))?;
    let email = builder.add_field("email", None)?;
    builder.update_field(&email, labelled("Parent email", true))?;

    let second_page = builder.add_page();
    builder.update_page(
        &second_page,
        PagePatch {
            title: Some("Options".to_string()),
            ..Default::default()
        },
    )?;
    let age = builder.add_field("number", None)?;
    builder.update_field(
        &age,
        FieldPatch {
            attributes: Some(FieldAttributes::Numeric {
                min: Some(8.0),
                max: Some(16.0),
                allow_decimal: false,
            }),
            ..labelled("Age", true)
        },
    )?;
    let session = builder.add_field("select", None)?;
    builder.update_field(
        &session,
        FieldPatch {
            attributes: Some(FieldAttributes::Choice {
                options: vec![
                    SelectOption::new("july", "july", "July", 0.0),
                    SelectOption::new("august", "august", "August", 0.0),
                    SelectOption::new("both", "both", "Both months", 150.0),
                ],
            }),
            disabled_after_submission: Some(true),
            ..labelled("Session", true)
        },
    )?;
    let notes = builder.add_field("textarea", None)?;
    builder.update_field(&notes, labelled("Allergies or notes", false))?;

    let id = builder.save_form(store).await?;
    println!("{id}");
    eprintln!("Preview: {}", builder.preview_url(config.preview_host()));
    Ok(())
}

fn labelled(label: &str, required: bool) -> FieldPatch {
    FieldPatch {
        required: Some(required),
        ..FieldPatch::label(label)
    }
}

/// Print the renderer schema of a stored form
async fn schema(config: &BuilderConfig, store: &mut FileStore, id: &str) -> Result<()> {
    let id = StoredId::from(id);
    let builder = FormBuilder::load_form(store, &id, config.context()).await?;
    println!("{}", project(builder.document()).to_json_pretty()?);
    Ok(())
}

async fn list(store: &FileStore) -> Result<()> {
    let ids = store.ids().await?;
    if ids.is_empty() {
        eprintln!("No forms in {}", store.dir().display());
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}
