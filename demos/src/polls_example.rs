use log::warn;
use puls_obywateli::civic::{format_datetime, PollQuery, PollStatus};
use puls_obywateli::prelude::*;
use puls_obywateli::query::InFlight;
use std::env;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let client = PulsObywateli::from_env()?;
    client.bootstrap().await;

    if let (Ok(email), Ok(password)) = (env::var("PULS_EMAIL"), env::var("PULS_PASSWORD")) {
        client.login(&email, &password).await?;
    }

    let stats = client.polls().stats().await?;
    println!("Poll statistics: {}", serde_json::Value::Object(stats));

    // A view that shows ongoing polls and ignores late answers once closed
    let view = client.view();
    let query = PollQuery::new().status(PollStatus::Ongoing).limit(10);
    view.query(QueryKey::polls().child("demo"), || client.polls().list(&query))
        .await;

    let state = view.state();
    if let Some(error) = &state.error {
        warn!("could not load polls: {}", error);
    }
    let polls = state.data.map(|page| page.into_items()).unwrap_or_default();
    view.unmount();

    println!("\n{}: {}", PollStatus::Ongoing.label(), polls.len());
    for poll in &polls {
        println!(
            "#{} [{}] {} (do {})",
            poll.id,
            poll.poll_type().label(),
            poll.title,
            poll.end_date.as_deref().map(format_datetime).unwrap_or_default()
        );
        for (option, result) in poll.results_in_order() {
            println!("   {}: {} ({}%)", option, result.votes, result.percentage);
        }
    }

    let Some(poll) = polls.iter().find(|poll| !poll.has_voted()) else {
        return Ok(());
    };
    if !client.session().is_authenticated() {
        return Ok(());
    }
    let Some(option) = poll.options.first() else {
        return Ok(());
    };

    let submitting = InFlight::new();
    if let Some(_guard) = submitting.try_begin() {
        let response = client.vote_in_poll(poll.id, option).await?;
        println!("\n{}", response.message.unwrap_or_default());
    }

    let refreshed = client.poll(poll.id).await?;
    println!("Your vote: {:?}", refreshed.user_vote);

    client.retract_poll_vote(poll.id).await?;
    client.logout().await;
    Ok(())
}
