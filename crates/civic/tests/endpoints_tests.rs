use puls_obywateli_civic::{
    BillOrdering, BillQuery, BillsApi, CivicError, CommentsApi, PollQuery, PollStatus, PollsApi,
    VoteChoice,
};
use puls_obywateli_http::{ApiClient, ErrorKind};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ApiClient {
    let api = ApiClient::new(&format!("{}/api", server.uri()), reqwest::Client::new()).unwrap();
    api.configure_auth(Some("A")).unwrap();
    api
}

#[tokio::test]
async fn test_bill_list_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bills/"))
        .and(query_param("ordering", "-voting_date"))
        .and(query_param("page", "2"))
        .and(query_param("search", "podatek"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 21,
            "next": null,
            "previous": "http://localhost/api/bills/?page=1",
            "results": [{ "id": 21, "title": "Ustawa o podatku", "status": "passed" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bills = BillsApi::new(api_for(&server));
    let query = BillQuery::new()
        .ordering(BillOrdering::NewestVotingDate)
        .page(2)
        .search(" podatek ");
    let page = bills.list(&query).await.unwrap();

    assert_eq!(page.count(), 21);
    assert!(page.has_previous());
    assert_eq!(page.items()[0].status().label(), "Przyjęty");
}

#[tokio::test]
async fn test_bill_vote_posts_choice_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bills/12/vote/"))
        .and(header("Authorization", "Bearer A"))
        .and(body_json(json!({ "vote": "support" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Głos został zapisany",
            "bill": {
                "id": 12,
                "title": "Projekt",
                "support_votes": 4,
                "against_votes": 1,
                "total_votes": 5,
                "user_vote": "support"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bills = BillsApi::new(api_for(&server));
    let response = bills.vote(12, VoteChoice::Support).await.unwrap();
    let bill = response.bill.unwrap();

    assert_eq!(bill.user_vote, Some(VoteChoice::Support));
    assert_eq!(bill.tally().support_pct, 80.0);
}

#[tokio::test]
async fn test_bill_vote_retraction() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/bills/12/vote/delete/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Głos został usunięty",
            "bill": { "id": 12, "title": "Projekt", "user_vote": null }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bills = BillsApi::new(api_for(&server));
    let response = bills.delete_vote(12).await.unwrap();
    assert_eq!(response.bill.unwrap().user_vote, None);
}

#[tokio::test]
async fn test_vote_without_session_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bills/3/vote/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Authentication credentials were not provided." })),
        )
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.configure_auth(None).unwrap();
    let err = BillsApi::new(api)
        .vote(3, VoteChoice::Against)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(
        err.server_message(),
        Some("Authentication credentials were not provided.")
    );
}

#[tokio::test]
async fn test_ai_analysis_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bills/5/ai-analysis/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis": {
                "changes": ["Nowa stawka"],
                "risks": [],
                "benefits": ["Niższe koszty"]
            },
            "analysis_date": "2024-03-12T10:00:00Z",
            "bill_id": 5,
            "bill_title": "Ustawa"
        })))
        .mount(&server)
        .await;

    let analysis = BillsApi::new(api_for(&server)).ai_analysis(5).await.unwrap();
    assert_eq!(analysis.analysis.changes, vec!["Nowa stawka"]);
    assert!(analysis.analysis.error.is_none());
    assert!(!analysis.analysis.is_empty());
}

#[tokio::test]
async fn test_bill_stats_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bills/stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_bills": 120,
            "active_bills": 40,
            "total_votes": 3000,
            "most_supported_bill": { "id": 1, "title": "A" },
            "most_controversial_bill": null,
            "status_distribution": { "passed": 30, "in_committee": 12 },
            "recent_bills": []
        })))
        .mount(&server)
        .await;

    let stats = BillsApi::new(api_for(&server)).stats().await.unwrap();
    assert_eq!(stats.total_bills, 120);
    assert_eq!(stats.status_distribution.get("passed"), Some(&30));
    assert!(stats.most_controversial_bill.is_none());
}

#[tokio::test]
async fn test_poll_list_and_vote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/polls/"))
        .and(query_param("status", "ongoing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 4, "title": "Sondaż", "poll_type": "political", "options": ["Tak", "Nie"] }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/polls/4/vote/"))
        .and(body_json(json!({ "selected_option": "Tak" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Głos oddany",
            "poll": { "id": 4, "title": "Sondaż", "user_vote": "Tak", "total_votes": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let polls = PollsApi::new(api_for(&server));
    let page = polls
        .list(&PollQuery::new().status(PollStatus::Ongoing))
        .await
        .unwrap();
    assert_eq!(page.items()[0].poll_type().label(), "Polityczny");

    let voted = polls.vote(4, "Tak").await.unwrap();
    assert!(voted.poll.unwrap().has_voted());
}

#[tokio::test]
async fn test_poll_vote_requires_option() {
    let server = MockServer::start().await;
    let err = PollsApi::new(api_for(&server))
        .vote(4, "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, CivicError::InvalidInput(_)));
}

#[tokio::test]
async fn test_comment_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/comments/bills/8/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 1, "content": "Dobry projekt", "user_nickname": "ania" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/comments/bills/8/"))
        .and(body_json(json!({ "content": "Popieram" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "content": "Popieram",
            "user": { "id": 9, "nickname": "Jan K." }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/comments/2/like/"))
        .and(body_json(json!({ "is_like": true })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/comments/2/like/delete/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let comments = CommentsApi::new(api_for(&server));
    let existing = comments.for_bill(8).await.unwrap();
    assert_eq!(existing.items()[0].author_nickname(), Some("ania"));

    let created = comments.add(8, "  Popieram ").await.unwrap();
    assert_eq!(created.author_nickname(), Some("Jan K."));

    comments.like(2).await.unwrap();
    comments.unlike(2).await.unwrap();
}

#[tokio::test]
async fn test_blank_comment_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = CommentsApi::new(api_for(&server))
        .add(8, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
