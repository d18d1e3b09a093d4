use clap::Subcommand;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::cli::client::{segment, ApiClient};
use crate::cli::utils::{output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Show a user")]
    Get {
        #[arg(help = "User ID (first.last)")]
        id: String,
        #[arg(long, env = "TCACHE_TENANT", help = "Tenant ID")]
        tenant: String,
    },

    #[command(about = "Create or replace a user; the ID is derived from the names")]
    Create {
        #[arg(long, env = "TCACHE_TENANT", help = "Tenant ID")]
        tenant: String,
        #[arg(long, help = "First name")]
        first: String,
        #[arg(long, help = "Last name")]
        last: String,
        #[arg(long, help = "Email address")]
        email: Option<String>,
    },

    #[command(about = "Change a user's names and/or email")]
    Update {
        #[arg(help = "User ID (first.last)")]
        id: String,
        #[arg(long, env = "TCACHE_TENANT", help = "Tenant ID")]
        tenant: String,
        #[arg(long, help = "New first name")]
        first: Option<String>,
        #[arg(long, help = "New last name")]
        last: Option<String>,
        #[arg(long, help = "New email address")]
        email: Option<String>,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User ID (first.last)")]
        id: String,
        #[arg(long, env = "TCACHE_TENANT", help = "Tenant ID")]
        tenant: String,
    },
}

fn user_body(first: Option<String>, last: Option<String>, email: Option<String>) -> Value {
    let mut body = Map::new();
    for (field, value) in [("firstName", first), ("lastName", last), ("email", email)] {
        if let Some(value) = value {
            body.insert(field.to_string(), Value::String(value));
        }
    }
    Value::Object(body)
}

pub async fn handle(client: &ApiClient, cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Get { id, tenant } => {
            let path = format!("/users/{}", segment(&id));
            let record = client.call(Method::GET, &path, Some(&tenant), None).await?;
            output_record(output_format, &record)
        }
        UserCommands::Create {
            tenant,
            first,
            last,
            email,
        } => {
            let body = user_body(Some(first), Some(last), email);
            let record = client.call(Method::POST, "/users", Some(&tenant), Some(&body)).await?;
            let id = record["id"].as_str().unwrap_or_default().to_string();
            output_success(output_format, &format!("User '{}' saved for tenant '{}'", id, tenant), Some(record))
        }
        UserCommands::Update {
            id,
            tenant,
            first,
            last,
            email,
        } => {
            if first.is_none() && last.is_none() && email.is_none() {
                anyhow::bail!("nothing to update: pass --first, --last and/or --email");
            }
            let path = format!("/users/{}", segment(&id));
            let body = user_body(first, last, email);
            let record = client.call(Method::PUT, &path, Some(&tenant), Some(&body)).await?;
            output_record(output_format, &record)
        }
        UserCommands::Delete { id, tenant } => {
            let path = format!("/users/{}", segment(&id));
            client.call(Method::DELETE, &path, Some(&tenant), None).await?;
            output_success(output_format, &format!("User '{}' deleted", id), None)
        }
    }
}
