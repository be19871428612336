//! Round trip against a real database. Needs `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

use dotenv::dotenv;
use uuid::Uuid;

use projectforge::db::{PgStore, ProjectFilter, ProjectRepository, TaskFilter, TaskRepository, UserRepository};
use projectforge::models::{PageRequest, Project, ProjectInput, Task, TaskInput, TaskStatus, User};

#[ignore]
#[actix_rt::test]
async fn test_postgres_store_round_trip() {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let store = PgStore::connect(&database_url, 2)
        .await
        .expect("Failed to connect to test DB");

    let email = format!("pg-{}@example.com", Uuid::new_v4());
    let user = User::new(email.clone(), "hash".into(), None);
    store.insert_user(&user).await.unwrap();
    assert!(store.insert_user(&user).await.is_err());
    assert_eq!(store.find_user_by_email(&email).await.unwrap().unwrap().id, user.id);

    let project = Project::new(
        ProjectInput {
            title: "100% done_ish".into(),
            description: None,
            status: None,
        },
        user.id,
    );
    store.insert_project(&project).await.unwrap();

    let literal = ProjectFilter {
        owner: user.id,
        search: Some("100%"),
    };
    assert_eq!(store.count_projects(literal).await.unwrap(), 1);
    let wildcard = ProjectFilter {
        owner: user.id,
        search: Some("1_0"),
    };
    assert_eq!(store.count_projects(wildcard).await.unwrap(), 0);

    for status in [TaskStatus::Todo, TaskStatus::Done] {
        let task = Task::new(
            TaskInput {
                title: "t".into(),
                description: None,
                status: Some(status),
                due_date: None,
            },
            project.id,
        );
        store.insert_task(&task).await.unwrap();
    }
    let done = TaskFilter {
        project_id: project.id,
        status: Some(TaskStatus::Done),
    };
    assert_eq!(store.list_tasks(done, PageRequest::default()).await.unwrap().len(), 1);

    assert!(store.delete_project_with_tasks(user.id, project.id).await.unwrap());
    let all = TaskFilter {
        project_id: project.id,
        status: None,
    };
    assert_eq!(store.count_tasks(all).await.unwrap(), 0);
    assert!(store.find_project(project.id).await.unwrap().is_none());
}
