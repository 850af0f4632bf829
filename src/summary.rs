use crate::mailer::Mailer;
use crate::models::{Habit, Individual, PersonStats};
use crate::remote::{RemoteError, RemoteStore};
use chrono::{Duration, Local, NaiveDate};
use thiserror::Error;
use tracing::{error, info};

/// The two-user household this tracker serves.
pub const RECIPIENTS: [&str; 2] = [
    "martin.habitbuddies@gmail.com",
    "elise.habitbuddies@gmail.com",
];

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

/// Per-person completion counts, same rule everywhere: a habit counts
/// for a person when its tag covers them; an empty denominator is
/// exactly 0, never a division error.
pub fn person_stats(habits: &[Habit], who: Individual) -> PersonStats {
    let applicable: Vec<&Habit> = habits.iter().filter(|h| h.person.applies_to(who)).collect();
    let total = applicable.len();
    let completed = applicable.iter().filter(|h| h.completed.get(who)).count();
    let percentage = if total == 0 {
        0
    } else {
        (100.0 * completed as f64 / total as f64).round() as u8
    };
    PersonStats {
        completed,
        total,
        percentage,
    }
}

pub fn yesterday_key_at(today: NaiveDate) -> String {
    (today - Duration::days(1)).to_string()
}

fn mark(done: bool) -> &'static str {
    if done {
        "✅"
    } else {
        "❌"
    }
}

fn habit_line(habit: &Habit) -> String {
    let mut spans = String::new();
    if habit.person.applies_to(Individual::Martin) {
        let class = if habit.completed.martin { "completed" } else { "pending" };
        spans.push_str(&format!(
            r#"<span class="{class}">Martin: {}</span>"#,
            mark(habit.completed.martin)
        ));
    }
    if habit.person.applies_to(Individual::Elise) {
        let class = if habit.completed.elise { "completed" } else { "pending" };
        spans.push_str(&format!(
            r#"<span class="{class}" style="margin-left: 15px;">Elise: {}</span>"#,
            mark(habit.completed.elise)
        ));
    }
    format!(
        r#"<div class="habit"><strong>{}</strong><div style="margin-top: 5px;">{spans}</div></div>"#,
        habit.name
    )
}

/// The fixed daily report template. An empty habit list renders 0%
/// cards and an empty detail section rather than failing.
pub fn render_report(date: &str, habits: &[Habit]) -> String {
    let martin = person_stats(habits, Individual::Martin);
    let elise = person_stats(habits, Individual::Elise);
    let details: String = habits.iter().map(|h| habit_line(h)).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 10px 10px 0 0; }}
    .content {{ background: #f9f9f9; padding: 20px; border-radius: 0 0 10px 10px; }}
    .stats {{ display: flex; justify-content: space-around; margin: 20px 0; }}
    .stat-card {{ background: white; padding: 20px; border-radius: 8px; text-align: center; flex: 1; margin: 0 10px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
    .percentage {{ font-size: 2em; font-weight: bold; color: #667eea; }}
    .habits-list {{ margin: 20px 0; }}
    .habit {{ padding: 8px 0; border-bottom: 1px solid #eee; }}
    .completed {{ color: #28a745; }}
    .pending {{ color: #dc3545; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>📊 HabitBuddies Daily Summary</h1>
      <p>{date}</p>
    </div>
    <div class="content">
      <div class="stats">
        <div class="stat-card">
          <h3>Martin</h3>
          <div class="percentage">{martin_pct}%</div>
          <p>{martin_done}/{martin_total} habits completed</p>
        </div>
        <div class="stat-card">
          <h3>Elise</h3>
          <div class="percentage">{elise_pct}%</div>
          <p>{elise_done}/{elise_total} habits completed</p>
        </div>
      </div>

      <div class="habits-list">
        <h3>📝 Habit Details</h3>
        {details}
      </div>

      <p style="text-align: center; margin-top: 30px; color: #666;">
        Keep up the great work! 💪
      </p>
    </div>
  </div>
</body>
</html>"#,
        martin_pct = martin.percentage,
        martin_done = martin.completed,
        martin_total = martin.total,
        elise_pct = elise.percentage,
        elise_done = elise.completed,
        elise_total = elise.total,
    )
}

pub async fn run_summary(remote: &RemoteStore, mailer: &Mailer) -> Result<(), SummaryError> {
    run_summary_at(Local::now().date_naive(), remote, mailer).await
}

/// Fetches yesterday's shared row, renders the report, and sends it to
/// both recipients. A missing row means no data yet, not a failure; an
/// individual recipient's send failure is logged and does not stop the
/// other send.
pub async fn run_summary_at(
    today: NaiveDate,
    remote: &RemoteStore,
    mailer: &Mailer,
) -> Result<(), SummaryError> {
    let date = yesterday_key_at(today);
    let habits = remote.select_day(&date).await?.unwrap_or_default();
    info!("rendering summary for {date} with {} habits", habits.len());

    let subject = format!("HabitBuddies results for {date}");
    let html = render_report(&date, &habits);

    for to in RECIPIENTS {
        match mailer.send(to, &subject, &html).await {
            Ok(()) => info!("summary sent to {to}"),
            Err(err) => error!("failed to send summary to {to}: {err}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Completion, Person};

    fn habit(id: &str, name: &str, person: Person, martin: bool, elise: bool) -> Habit {
        Habit {
            id: id.to_string(),
            name: name.to_string(),
            person,
            completed: Completion { martin, elise },
        }
    }

    #[test]
    fn empty_denominator_is_exactly_zero() {
        let habits = vec![habit("1", "X", Person::Martin, true, false)];
        let elise = person_stats(&habits, Individual::Elise);
        assert_eq!(elise.total, 0);
        assert_eq!(elise.completed, 0);
        assert_eq!(elise.percentage, 0);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let habits = vec![
            habit("1", "A", Person::Both, true, false),
            habit("2", "B", Person::Both, true, false),
            habit("3", "C", Person::Both, false, false),
        ];
        // 2/3 rounds to 67.
        assert_eq!(person_stats(&habits, Individual::Martin).percentage, 67);
        assert_eq!(person_stats(&habits, Individual::Elise).percentage, 0);
    }

    #[test]
    fn yesterday_key_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(yesterday_key_at(today), "2026-02-28");
    }

    #[test]
    fn empty_report_renders_zero_percent_and_no_detail_rows() {
        let html = render_report("2026-08-29", &[]);
        assert!(html.contains("2026-08-29"));
        assert!(html.contains("0%"));
        assert!(html.contains("0/0 habits completed"));
        assert!(!html.contains(r#"<div class="habit">"#));
    }

    #[test]
    fn report_shows_marks_only_for_applicable_people() {
        let habits = vec![
            habit("1", "Run", Person::Martin, true, false),
            habit("2", "Yoga", Person::Elise, false, false),
        ];
        let html = render_report("2026-08-29", &habits);
        let run_line = html
            .split(r#"<div class="habit">"#)
            .find(|chunk| chunk.contains("Run"))
            .unwrap();
        assert!(run_line.contains("Martin: ✅"));
        assert!(!run_line.contains("Elise:"));

        let yoga_line = html
            .split(r#"<div class="habit">"#)
            .find(|chunk| chunk.contains("Yoga"))
            .unwrap();
        assert!(yoga_line.contains("Elise: ❌"));
        assert!(!yoga_line.contains("Martin:"));
    }

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockProviders {
        base_url: String,
        sends: Arc<AtomicUsize>,
        bodies: Arc<Mutex<Vec<String>>>,
    }

    /// One local server standing in for both the row store and the email
    /// provider. The first email request fails, the rest succeed.
    async fn spawn_providers(rows: serde_json::Value) -> MockProviders {
        use axum::http::StatusCode;
        use axum::routing::{get, post};
        use axum::{Json, Router};

        let sends = Arc::new(AtomicUsize::new(0));
        let bodies = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route(
                "/rest/v1/daily_habits",
                get(move || {
                    let rows = rows.clone();
                    async move { Json(rows) }
                }),
            )
            .route("/emails", {
                let sends = Arc::clone(&sends);
                let bodies = Arc::clone(&bodies);
                post(move |body: String| {
                    let sends = Arc::clone(&sends);
                    let bodies = Arc::clone(&bodies);
                    async move {
                        bodies.lock().unwrap().push(body);
                        if sends.fetch_add(1, Ordering::SeqCst) == 0 {
                            StatusCode::INTERNAL_SERVER_ERROR
                        } else {
                            StatusCode::OK
                        }
                    }
                })
            });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockProviders {
            base_url: format!("http://{addr}"),
            sends,
            bodies,
        }
    }

    #[tokio::test]
    async fn job_succeeds_with_no_row_and_a_failed_recipient() {
        let providers = spawn_providers(serde_json::json!([])).await;
        let remote = RemoteStore::new(providers.base_url.as_str(), "test-key");
        let mailer = Mailer::new("test-key", format!("{}/emails", providers.base_url));

        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let result = run_summary_at(today, &remote, &mailer).await;
        assert!(result.is_ok());

        // First send failed, but the second recipient was still tried.
        assert_eq!(providers.sends.load(Ordering::SeqCst), 2);
        let bodies = providers.bodies.lock().unwrap();
        assert!(bodies[0].contains("2026-08-29"));
        assert!(bodies[0].contains("0/0 habits completed"));
    }

    #[tokio::test]
    async fn job_reports_stored_completions() {
        let habits = vec![
            habit("1", "Exercise", Person::Both, true, false),
            habit("2", "Read", Person::Both, true, true),
        ];
        let providers = spawn_providers(serde_json::json!([{ "habits": habits }])).await;
        let remote = RemoteStore::new(providers.base_url.as_str(), "test-key");
        let mailer = Mailer::new("test-key", format!("{}/emails", providers.base_url));

        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        run_summary_at(today, &remote, &mailer).await.unwrap();

        assert_eq!(providers.sends.load(Ordering::SeqCst), 2);
        let bodies = providers.bodies.lock().unwrap();
        assert!(bodies[1].contains("2/2 habits completed"));
        assert!(bodies[1].contains("1/2 habits completed"));
        assert!(bodies[1].contains("Exercise"));
    }

    #[test]
    fn report_embeds_both_fractions() {
        let habits = vec![
            habit("1", "A", Person::Both, true, true),
            habit("2", "B", Person::Both, true, false),
        ];
        let html = render_report("2026-08-29", &habits);
        assert!(html.contains("100%"));
        assert!(html.contains("2/2 habits completed"));
        assert!(html.contains("50%"));
        assert!(html.contains("1/2 habits completed"));
    }
}
