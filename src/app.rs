use crate::api::{
    Entity, EntityClient, HealthEntry, NewUser, RecordId, SchoolActivity, Task, UserClient,
};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::network::{Handler as NetworkEventHandler, NetworkEventReceiver};
use crate::screen::Screen;
use log::*;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::{mpsc, Arc};
use tokio::sync::Mutex;

/// Specifying the entity collections reachable from the command line.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Domain {
    Tasks,
    School,
    Health,
}

impl FromStr for Domain {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tasks" => Ok(Domain::Tasks),
            "school" => Ok(Domain::School),
            "health" => Ok(Domain::Health),
            other => Err(AppError::Other(format!("Unknown domain '{}'", other))),
        }
    }
}

/// Specifying the screen actions a domain command performs.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Action {
    List,
    Add { assignments: Vec<(String, String)> },
    Edit { id: RecordId, assignments: Vec<(String, String)> },
    Delete { id: RecordId, confirmed: bool },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UserAction {
    List,
    Add { name: String, email: String },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Entity { domain: Domain, action: Action },
    Users(UserAction),
}

/// Parse a `field=value` assignment.
///
pub fn parse_assignment(value: &str) -> AppResult<(String, String)> {
    match value.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_owned(), value.to_owned()))
        }
        _ => Err(AppError::Other(format!("Expected field=value, got '{}'", value))),
    }
}

/// Oversees command execution against the configured service.
///
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        App { config }
    }

    /// Execute a command, writing results to `out` and reading any
    /// confirmation from `input`.
    ///
    pub async fn execute<W, R>(
        &self,
        command: Command,
        out: &mut W,
        input: &mut R,
    ) -> AppResult<()>
    where
        W: Write,
        R: BufRead,
    {
        info!("Executing {:?} against {}...", command, self.config.base_url);
        match command {
            Command::Entity { domain, action } => match domain {
                Domain::Tasks => self.run::<Task, _, _>(action, out, input).await,
                Domain::School => self.run::<SchoolActivity, _, _>(action, out, input).await,
                Domain::Health => self.run::<HealthEntry, _, _>(action, out, input).await,
            },
            Command::Users(action) => self.run_users(action, out).await,
        }
    }

    /// Drive an entity screen through one action: mount, apply the action,
    /// then print the resulting list.
    ///
    async fn run<E, W, R>(&self, action: Action, out: &mut W, input: &mut R) -> AppResult<()>
    where
        E: Entity,
        W: Write,
        R: BufRead,
    {
        let client = EntityClient::<E>::new(&self.config.base_url)?;
        let (tx, rx) = mpsc::channel();
        let screen = Arc::new(Mutex::new(Screen::<E>::new(self.config.session(), tx)));
        let mut handler = NetworkEventHandler::new(&screen, &client);

        screen.lock().await.mount();
        handler.drain(&rx).await;
        {
            let screen = screen.lock().await;
            if let Some(kind) = screen.store().last_error() {
                return Err(AppError::Other(format!(
                    "Could not load {}: {}",
                    E::COLLECTION,
                    kind
                )));
            }
        }

        match action {
            Action::List => {}
            Action::Add { assignments } => {
                {
                    let mut screen = screen.lock().await;
                    screen.request_add()?;
                    fill(&mut screen, &assignments)?;
                    screen.save()?;
                }
                settle(&screen, &mut handler, &rx).await?;
            }
            Action::Edit { id, assignments } => {
                {
                    let mut screen = screen.lock().await;
                    screen.select_for_edit(id)?;
                    fill(&mut screen, &assignments)?;
                    screen.save()?;
                }
                settle(&screen, &mut handler, &rx).await?;
            }
            Action::Delete { id, confirmed } => {
                let record = {
                    let mut screen = screen.lock().await;
                    screen.request_delete(id)?;
                    screen.selected().map(ToString::to_string).unwrap_or_default()
                };
                if !confirmed && !confirm(&format!("Delete {}?", record), out, input)? {
                    screen.lock().await.cancel()?;
                    writeln!(out, "Cancelled.")?;
                    return Ok(());
                }
                screen.lock().await.confirm_delete()?;
                settle(&screen, &mut handler, &rx).await?;
            }
        }

        let screen = screen.lock().await;
        if screen.records().is_empty() {
            writeln!(out, "No {} found.", E::COLLECTION)?;
        }
        for record in screen.records() {
            writeln!(out, "{}", record)?;
        }
        Ok(())
    }

    async fn run_users<W: Write>(&self, action: UserAction, out: &mut W) -> AppResult<()> {
        let client = UserClient::new(&self.config.base_url)?;
        match action {
            UserAction::List => {
                for user in client.list().await? {
                    writeln!(out, "{}", user)?;
                }
            }
            UserAction::Add { name, email } => {
                let user = client.create(&NewUser { name, email }).await?;
                writeln!(out, "Registered {}", user)?;
            }
        }
        Ok(())
    }
}

fn fill<E: Entity>(screen: &mut Screen<E>, assignments: &[(String, String)]) -> AppResult<()> {
    for (field, value) in assignments {
        screen.set_field(field, value.as_str())?;
    }
    Ok(())
}

/// Handle queued network events and surface any failure notification.
///
async fn settle<E: Entity>(
    screen: &Arc<Mutex<Screen<E>>>,
    handler: &mut NetworkEventHandler<'_, E>,
    receiver: &NetworkEventReceiver<E>,
) -> AppResult<()> {
    handler.drain(receiver).await;
    match screen.lock().await.acknowledge_notification() {
        Some(notification) => Err(AppError::Other(notification.to_string())),
        None => Ok(()),
    }
}

fn confirm<W: Write, R: BufRead>(question: &str, out: &mut W, input: &mut R) -> AppResult<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    fn app(server: &MockServer) -> App {
        let mut config = Config::new();
        config.base_url = server.base_url();
        config.user_id = 2;
        App::new(config)
    }

    async fn execute(app: &App, command: Command, input: &str) -> (AppResult<()>, String) {
        let mut out = Vec::new();
        let result = app.execute(command, &mut out, &mut input.as_bytes()).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("title=Buy milk").unwrap(),
            ("title".to_string(), "Buy milk".to_string())
        );
        assert_eq!(
            parse_assignment("description=").unwrap(),
            ("description".to_string(), String::new())
        );
        assert!(parse_assignment("title").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_domain_from_str() {
        assert_eq!("school".parse::<Domain>().unwrap(), Domain::School);
        assert!("notes".parse::<Domain>().is_err());
    }

    #[tokio::test]
    async fn list_prints_records_for_configured_user() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/tasks/").query_param("user_id", "2");
                then.status(200).json_body(json!([
                    { "id": 42, "title": "Buy milk", "description": null,
                      "due_date": "2024-05-01T00:00:00", "completed": false, "user_id": 2 }
                ]));
            })
            .await;
        let command = Command::Entity {
            domain: Domain::Tasks,
            action: Action::List,
        };
        let (result, out) = execute(&app(&server), command, "").await;
        result.unwrap();
        mock.assert_async().await;
        assert_eq!(out, "#42 [ ] Buy milk (due 2024-05-01)\n");
    }

    #[tokio::test]
    async fn list_failure_is_reported() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/health/");
                then.status(500);
            })
            .await;
        let command = Command::Entity {
            domain: Domain::Health,
            action: Action::List,
        };
        let (result, _) = execute(&app(&server), command, "").await;
        assert!(matches!(result, Err(AppError::Other(message)) if message.contains("health")));
    }

    #[tokio::test]
    async fn add_with_malformed_date_makes_no_request() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/school/");
                then.status(200).json_body(json!([]));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method("POST").path("/school/");
                then.status(200);
            })
            .await;
        let command = Command::Entity {
            domain: Domain::School,
            action: Action::Add {
                assignments: vec![
                    ("subject".to_string(), "Math".to_string()),
                    ("deadline".to_string(), "soon".to_string()),
                ],
            },
        };
        let (result, _) = execute(&app(&server), command, "").await;
        assert!(matches!(result, Err(AppError::Screen(_))));
        create.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn declined_delete_is_cancelled() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/tasks/");
                then.status(200).json_body(json!([
                    { "id": 5, "title": "Keep me", "description": null,
                      "due_date": null, "completed": false, "user_id": 2 }
                ]));
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/tasks/5");
                then.status(200);
            })
            .await;
        let command = Command::Entity {
            domain: Domain::Tasks,
            action: Action::Delete {
                id: 5,
                confirmed: false,
            },
        };
        let (result, out) = execute(&app(&server), command, "n\n").await;
        result.unwrap();
        delete.assert_hits_async(0).await;
        assert!(out.starts_with("Delete #5 [ ] Keep me? [y/N] "));
        assert!(out.ends_with("Cancelled.\n"));
    }

    #[tokio::test]
    async fn failed_delete_returns_notification() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/health/");
                then.status(200).json_body(json!([
                    { "id": 3, "activity": "Yoga", "description": null,
                      "time": "18:00", "date": null, "user_id": 2 }
                ]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("DELETE").path("/health/3");
                then.status(500).json_body(json!({ "detail": "Database unavailable" }));
            })
            .await;
        let command = Command::Entity {
            domain: Domain::Health,
            action: Action::Delete {
                id: 3,
                confirmed: true,
            },
        };
        let (result, _) = execute(&app(&server), command, "").await;
        match result {
            Err(AppError::Other(message)) => {
                assert!(message.contains("Could not delete health entry"));
                assert!(message.contains("Database unavailable"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn users_list_and_add() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users/");
                then.status(200).json_body(json!([
                    { "id": 1, "name": "Ada", "email": "ada@example.com" }
                ]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/users/")
                    .json_body(json!({ "name": "Grace", "email": "grace@example.com" }));
                then.status(200)
                    .json_body(json!({ "id": 2, "name": "Grace", "email": "grace@example.com" }));
            })
            .await;
        let app = app(&server);

        let (result, out) = execute(&app, Command::Users(UserAction::List), "").await;
        result.unwrap();
        assert_eq!(out, "#1 Ada <ada@example.com>\n");

        let command = Command::Users(UserAction::Add {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
        });
        let (result, out) = execute(&app, command, "").await;
        result.unwrap();
        assert_eq!(out, "Registered #2 Grace <grace@example.com>\n");
    }
}
