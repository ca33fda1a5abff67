use log::info;
use puls_obywateli::auth::{PasswordChange, UserPatch};
use puls_obywateli::prelude::*;
use uuid::Uuid;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    // Reads PULS_API_ORIGIN, PULS_STORAGE_DIR, ... from the environment or .env
    let client = PulsObywateli::from_env()?;

    let status = client.bootstrap().await;
    println!("Session after start-up: {:?}", status);

    if status == SessionStatus::Authenticated {
        if let Some(user) = client.session().user() {
            println!("Restored session for {}", user.display_name());
        }
        client.logout().await;
    }

    let unique_id = Uuid::new_v4().simple().to_string();
    let email = format!("demo-{}@example.com", &unique_id[..8]);
    let password = "BezpieczneHaslo123!";

    println!("Registering {}", email);
    let registration = RegisterData {
        email: email.clone(),
        username: format!("demo_{}", &unique_id[..8]),
        nickname: format!("Demo {}", &unique_id[..4]),
        password: password.to_string(),
        password_confirm: password.to_string(),
        first_name: Some("Jan".to_string()),
        last_name: None,
    };

    match client.register(&registration).await {
        Ok(user) => println!("Registered user {} ({})", user.id, user.nickname),
        Err(err) => {
            println!("Registration failed: {}", err);
            if let Error::Auth(auth_err) = &err {
                if let Some(fields) = auth_err.validation_errors() {
                    println!("Field errors: {}", fields);
                }
            }
            return Ok(());
        }
    }

    let account = client.account();

    let patch = UserPatch {
        bio: Some("Interesuję się polityką lokalną".to_string()),
        ..UserPatch::default()
    };
    let updated = account.update_profile(&patch).await?;
    println!("Bio is now: {:?}", updated.bio);

    let stats = account.stats().await?;
    println!(
        "Votes: {}, comments: {}",
        stats.votes_count, stats.comments_count
    );

    let change = PasswordChange {
        old_password: password.to_string(),
        new_password: "JeszczeBezpieczniejsze456!".to_string(),
        new_password_confirm: "JeszczeBezpieczniejsze456!".to_string(),
    };
    if let Some(message) = account.change_password(&change).await? {
        println!("{}", message);
    }

    client.logout().await;
    info!("demo finished with status {:?}", client.session().status());

    println!("\nLogging in again with a wrong password");
    if let Err(err) = client.login(&email, "zle-haslo").await {
        println!(
            "Rejected: {}",
            err.server_message().unwrap_or("no message from server")
        );
    }

    Ok(())
}
