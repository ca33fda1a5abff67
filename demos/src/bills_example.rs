use puls_obywateli::civic::{format_date, BillOrdering, BillQuery, VoteChoice};
use puls_obywateli::prelude::*;
use std::env;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let client = PulsObywateli::from_env()?;
    client.bootstrap().await;

    // Optional credentials to try voting and commenting
    if let (Ok(email), Ok(password)) = (env::var("PULS_EMAIL"), env::var("PULS_PASSWORD")) {
        client.login(&email, &password).await?;
    }

    let stats = client.bills().stats().await?;
    println!(
        "{} bills, {} active, {} citizen votes",
        stats.total_bills, stats.active_bills, stats.total_votes
    );

    let query = BillQuery::new()
        .ordering(BillOrdering::NewestVoting)
        .page(1);
    let page = client.bill_list(&query).await?;
    println!(
        "\n{} ({} bills in total)",
        BillOrdering::NewestVoting.label(),
        page.count()
    );

    for bill in page.items().iter().take(5) {
        let status = bill.status();
        println!(
            "#{} [{}] {} ({})",
            bill.id,
            status.label(),
            bill.title,
            bill.project_type().label()
        );
        if let Some(date) = &bill.voting_date {
            println!("   głosowanie: {}", format_date(date));
        }
        if let Some(sejm) = bill.sejm_tally() {
            println!(
                "   Sejm: za {} ({}%), przeciw {} ({}%), wstrzymali {}",
                sejm.support, sejm.support_pct, sejm.against, sejm.against_pct, sejm.neutral
            );
        }
        let tally = bill.tally();
        println!(
            "   obywatele: za {}%, przeciw {}%, neutralnie {}% ({} głosów)",
            tally.support_pct, tally.against_pct, tally.neutral_pct, tally.total
        );
    }

    let Some(first) = page.items().first() else {
        println!("No bills yet");
        return Ok(());
    };

    let comments = client.bill_comments(first.id).await?;
    println!("\n{} comments under #{}", comments.count(), first.id);
    for comment in comments.items() {
        println!(
            "- {}: {}",
            comment.author_nickname().unwrap_or("anonim"),
            comment.content
        );
    }

    match client.bills().ai_analysis(first.id).await {
        Ok(response) if response.analysis.error.is_none() => {
            println!("\nAI analysis:");
            for change in &response.analysis.changes {
                println!("  zmiana: {}", change);
            }
            for risk in &response.analysis.risks {
                println!("  ryzyko: {}", risk);
            }
            for benefit in &response.analysis.benefits {
                println!("  korzyść: {}", benefit);
            }
        }
        Ok(response) => println!("\nAI analysis unavailable: {:?}", response.analysis.error),
        Err(err) => println!("\nAI analysis failed: {}", err),
    }

    if client.session().is_authenticated() {
        let response = client.vote_on_bill(first.id, VoteChoice::Support).await?;
        println!("\n{}", response.message.unwrap_or_default());

        let refreshed = client.bill(first.id).await?;
        println!("Your vote: {:?}", refreshed.user_vote.map(VoteChoice::label));

        client.add_comment(first.id, "Komentarz z klienta Rust").await?;
        client.retract_bill_vote(first.id).await?;
        client.logout().await;
    }

    Ok(())
}
