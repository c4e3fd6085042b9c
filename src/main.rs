use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use cloudcast::chat::ChatInput;
use cloudcast::client::{Backend, HttpBackend};
use cloudcast::models::{
    AddMemberInput, ConversationType, CreateConversationInput, CreateProjectInput, CreateUserInput,
    TaskLabel, TaskPriority, UserStatus,
};
use cloudcast::pages::{TaskBoard, UsersPage};
use cloudcast::session::Session;
use cloudcast::table::{CheckState, DataTable, TableRow};
use cloudcast::task_dialog::{TaskCreateDialog, TASK_CREATED_NOTICE};
use cloudcast::{api, db};

#[derive(Parser)]
#[command(name = "cloudcast")]
#[command(about = "Project and communication dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the datastore API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Database file (defaults to the platform data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Register user accounts
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Organization setup
    Org {
        #[command(subcommand)]
        command: OrgCommand,
    },
    /// List the members of an organization
    Members {
        #[arg(long)]
        org: Uuid,

        /// Only show members whose email contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Page to show, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// Project maintenance
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Task board operations
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Conversation setup
    Conversation {
        #[command(subcommand)]
        command: ConversationCommand,
    },
    /// Send a chat message
    Send {
        #[arg(long)]
        conversation: Uuid,

        /// Sender user id
        #[arg(long)]
        user: Uuid,

        content: String,
    },
    /// Show the messages of a conversation
    Messages {
        #[arg(long)]
        conversation: Uuid,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    /// Create a user account
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        avatar_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum OrgCommand {
    /// Create an organization
    Create { name: String },
    /// Add a user to an organization
    AddMember {
        #[arg(long)]
        org: Uuid,

        #[arg(long)]
        user: Uuid,

        #[arg(long, default_value = "member")]
        role: String,

        /// active or inactive
        #[arg(long, default_value = "active")]
        status: String,
    },
    /// List an organization's projects
    Projects {
        #[arg(long)]
        org: Uuid,
    },
}

#[derive(Subcommand)]
enum ConversationCommand {
    /// Create a conversation
    Create {
        name: String,

        /// dm or group
        #[arg(long, default_value = "group")]
        kind: String,

        #[arg(long, default_value = "")]
        avatar: String,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project in an organization
    Create {
        #[arg(long)]
        org: Uuid,

        name: String,

        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a project
    Delete { id: Uuid },
    /// Set a project's status
    SetStatus { id: Uuid, status: String },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// List the tasks of a project
    List {
        #[arg(long)]
        project: Uuid,

        /// Only show tasks whose title contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create a task
    Create {
        #[arg(long)]
        org: Uuid,

        /// Creating user id
        #[arg(long)]
        user: Uuid,

        #[arg(long)]
        project: Uuid,

        #[arg(long)]
        assignee: Uuid,

        #[arg(long)]
        title: String,

        /// Feature, Bug or Improvement
        #[arg(long, default_value = "Feature")]
        label: String,

        /// High, Medium or Low
        #[arg(long, default_value = "Medium")]
        priority: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cloudcast=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, db }) => serve(port, db).await?,
        None => serve(3000, None).await?,
        Some(Commands::User { command }) => {
            let backend = HttpBackend::from_env()?;
            match command {
                UserCommand::Create {
                    name,
                    email,
                    avatar_url,
                } => {
                    let profile = backend
                        .create_user(&CreateUserInput {
                            name,
                            email,
                            avatar_url,
                        })
                        .await?;
                    println!("Created user {} ({})", profile.name, profile.id);
                }
            }
        }
        Some(Commands::Org { command }) => {
            let backend = HttpBackend::from_env()?;
            match command {
                OrgCommand::Create { name } => {
                    let organization = backend.create_organization(&name).await?;
                    println!("Created organization {} ({})", organization.name, organization.id);
                }
                OrgCommand::AddMember {
                    org,
                    user,
                    role,
                    status,
                } => {
                    let status = UserStatus::from_str(&status)
                        .ok_or_else(|| anyhow::anyhow!("unknown member status {status:?}"))?;
                    backend
                        .add_member(org, &AddMemberInput { user_id: user, role, status })
                        .await?;
                    println!("Member added successfully");
                }
                OrgCommand::Projects { org } => {
                    let projects = backend.list_projects(org).await?;
                    if projects.is_empty() {
                        println!("No projects.");
                    }
                    for project in projects {
                        println!("{}  {}  [{}]", project.id, project.name, project.status);
                    }
                }
            }
        }
        Some(Commands::Conversation { command }) => {
            let backend = HttpBackend::from_env()?;
            match command {
                ConversationCommand::Create { name, kind, avatar } => {
                    let kind = ConversationType::from_str(&kind)
                        .ok_or_else(|| anyhow::anyhow!("unknown conversation type {kind:?}"))?;
                    let conversation = backend
                        .create_conversation(&CreateConversationInput { kind, name, avatar })
                        .await?;
                    println!("Created conversation {} ({})", conversation.name, conversation.id);
                }
            }
        }
        Some(Commands::Members { org, filter, page }) => {
            let backend = HttpBackend::from_env()?;
            let mut users = UsersPage::new();
            users.select_organization(Some(org));
            users.refresh(&backend).await;
            if let Some(error) = users.members().last_error() {
                anyhow::bail!("Error fetching users: {error}");
            }
            if let Some(filter) = filter {
                users.table_mut().set_filter(filter);
            }
            for _ in 1..page {
                if !users.table_mut().next_page() {
                    break;
                }
            }
            print_table(users.table());
        }
        Some(Commands::Project { command }) => {
            let backend = HttpBackend::from_env()?;
            match command {
                ProjectCommand::Create { org, name, status } => {
                    let project = backend
                        .create_project(&CreateProjectInput {
                            organization_id: org,
                            name,
                            status,
                        })
                        .await?;
                    println!("Created project {} ({})", project.name, project.id);
                }
                ProjectCommand::Delete { id } => {
                    backend.delete_project(id).await?;
                    println!("Project deleted successfully");
                }
                ProjectCommand::SetStatus { id, status } => {
                    backend.update_project_status(id, &status).await?;
                    println!("Project status updated successfully");
                }
            }
        }
        Some(Commands::Tasks { command }) => {
            let backend = HttpBackend::from_env()?;
            match command {
                TaskCommand::List { project, filter } => {
                    let mut board = TaskBoard::new();
                    board.select_project(Some(project));
                    board.refresh(&backend).await;
                    if let Some(error) = board.tasks().last_error() {
                        anyhow::bail!("Error fetching tasks: {error}");
                    }
                    if let Some(filter) = filter {
                        board.table_mut().set_filter(filter);
                    }
                    print_table(board.table());
                }
                TaskCommand::Create {
                    org,
                    user,
                    project,
                    assignee,
                    title,
                    label,
                    priority,
                } => {
                    let label = TaskLabel::from_str(&label)
                        .ok_or_else(|| anyhow::anyhow!("unknown label {label:?}"))?;
                    let priority = TaskPriority::from_str(&priority)
                        .ok_or_else(|| anyhow::anyhow!("unknown priority {priority:?}"))?;
                    let session = Session::new()
                        .with_organization(org, "")
                        .with_user(user, "");

                    let mut board = TaskBoard::new();
                    board.select_project(Some(project));

                    let mut dialog = TaskCreateDialog::new(Some(project), Vec::new());
                    dialog.open();
                    dialog.set_title(title);
                    dialog.set_label(label);
                    dialog.set_priority(priority);
                    dialog.set_assignee(Some(assignee));

                    let task = dialog
                        .submit(&session, &backend, || board.request_refresh())
                        .await?;
                    println!("{TASK_CREATED_NOTICE} ({})", task.id);

                    if board.needs_refresh() {
                        board.refresh(&backend).await;
                        print_table(board.table());
                    }
                }
            }
        }
        Some(Commands::Send {
            conversation,
            user,
            content,
        }) => {
            let backend = HttpBackend::from_env()?;
            let session = Session::new().with_user(user, "");
            let input = ChatInput::new(conversation);
            input.set_draft(content);
            let message = input.send(&session, &backend).await?;
            println!("Sent message {}", message.id);
        }
        Some(Commands::Messages { conversation }) => {
            let backend = HttpBackend::from_env()?;
            for message in backend.list_messages(conversation).await? {
                let sender = message
                    .sender
                    .as_ref()
                    .map(|sender| sender.name.as_str())
                    .unwrap_or("unknown");
                println!(
                    "[{}] {}: {}",
                    message.created_at.format("%Y-%m-%d %H:%M"),
                    sender,
                    message.content
                );
            }
        }
    }

    Ok(())
}

async fn serve(port: u16, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!("Starting CloudCast server on port {}", port);

    let db = match db_path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("CloudCast server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_table<R: TableRow>(table: &DataTable<R>) {
    let view = table.view();
    if !view.filter.is_empty() {
        println!("Filter: {}", view.filter);
    }

    let marker = match view.select_all {
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
        CheckState::Unchecked => "[ ]",
    };
    let titles: Vec<&str> = view.headers.iter().map(|h| h.title).collect();
    println!("{} {}", marker, titles.join(" | "));

    if view.is_empty() {
        println!("No results.");
    }
    for row in &view.rows {
        let marker = if row.selected { "[x]" } else { "[ ]" };
        println!("{} {}", marker, row.cells.join(" | "));
    }

    println!(
        "{}  Page {} of {}",
        view.selection_summary(),
        view.page_index + 1,
        view.page_count
    );
}
