use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use campus_directory::app::directory::DirectoryService;
use campus_directory::common::error::DirectoryError;
use campus_directory::domain::{Role, SignupRequest, UserRecord};
use campus_directory::registry::StoreRegistry;
use campus_directory::storage::{InMemoryStore, UserStore};

fn registry() -> Arc<StoreRegistry> {
    Arc::new(StoreRegistry::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(InMemoryStore::new()),
        Arc::new(InMemoryStore::new()),
    ))
}

fn signup_request(name: &str, email: &str, phone: &str, role: &str) -> SignupRequest {
    SignupRequest {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        university: "Example U".to_string(),
        password: "pw".to_string(),
        role: role.to_string(),
        university_key: "exu".to_string(),
        access_to_students: vec![],
        access_to_teachers: vec![],
    }
}

fn record(email: &str, phone: &str, password: &str, role: Role) -> UserRecord {
    UserRecord {
        id: None,
        name: "Test".to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        university: "Example U".to_string(),
        password: password.to_string(),
        role,
        university_key: "exu".to_string(),
        access_to_students: vec![],
        access_to_teachers: vec![],
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn signup_rejects_unknown_roles() -> Result<()> {
    let service = DirectoryService::new(registry());
    for label in ["janitor", "Admin", "STUDENT", ""] {
        let err = service
            .signup(signup_request("Ada", "ada@example.edu", "555-0101", label))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidRole(_)), "label {label:?}");
    }
    Ok(())
}

#[tokio::test]
async fn signup_rejects_duplicate_email_or_phone() -> Result<()> {
    let service = DirectoryService::new(registry());
    service
        .signup(signup_request("Ada", "ada@example.edu", "555-0101", "student"))
        .await?;

    // Same email, different phone
    let err = service
        .signup(signup_request("Imposter", "ada@example.edu", "555-0999", "student"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::DuplicateUser));

    // Same phone, different email
    let err = service
        .signup(signup_request("Imposter", "other@example.edu", "555-0101", "student"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::DuplicateUser));

    // Same identity in a different role's store is allowed
    service
        .signup(signup_request("Ada", "ada@example.edu", "555-0101", "teacher"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn login_matches_email_or_phone_with_exact_password() -> Result<()> {
    let service = DirectoryService::new(registry());
    service
        .signup(signup_request("Ada", "ada@example.edu", "555-0101", "teacher"))
        .await?;

    let by_email = service.login("ada@example.edu", "pw").await?;
    assert_eq!(by_email.role, Role::Teacher);
    let by_phone = service.login("555-0101", "pw").await?;
    assert_eq!(by_phone.email, "ada@example.edu");

    let err = service.login("ada@example.edu", "wrong").await.unwrap_err();
    assert!(matches!(err, DirectoryError::InvalidCredentials));
    let err = service.login("nobody@example.edu", "pw").await.unwrap_err();
    assert!(matches!(err, DirectoryError::InvalidCredentials));
    Ok(())
}

#[tokio::test]
async fn login_prefers_admin_then_student_then_teacher() -> Result<()> {
    let registry = registry();
    let service = DirectoryService::new(registry.clone());

    // The same loginId/password pair in all three stores
    for role in [Role::Admin, Role::Teacher, Role::Student] {
        let mut rec = record("shared@example.edu", "555-0100", "pw", role);
        registry.resolve(role).insert(&mut rec).await?;
    }
    let user = service.login("shared@example.edu", "pw").await?;
    assert_eq!(user.role, Role::Admin);

    // Only student and teacher: student wins
    let registry = self::registry();
    let service = DirectoryService::new(registry.clone());
    for role in [Role::Teacher, Role::Student] {
        let mut rec = record("shared@example.edu", "555-0100", "pw", role);
        registry.resolve(role).insert(&mut rec).await?;
    }
    let user = service.login("shared@example.edu", "pw").await?;
    assert_eq!(user.role, Role::Student);
    Ok(())
}

#[tokio::test]
async fn admin_access_resolves_references_in_order() -> Result<()> {
    let registry = registry();
    let service = DirectoryService::new(registry.clone());

    let mut teacher_a = record("ta@example.edu", "555-0201", "pw", Role::Teacher);
    registry.resolve(Role::Teacher).insert(&mut teacher_a).await?;
    let mut teacher_b = record("tb@example.edu", "555-0202", "pw", Role::Teacher);
    registry.resolve(Role::Teacher).insert(&mut teacher_b).await?;
    let mut student = record("s@example.edu", "555-0301", "pw", Role::Student);
    registry.resolve(Role::Student).insert(&mut student).await?;

    let mut admin = record("admin@example.edu", "555-0401", "pw", Role::Admin);
    admin.access_to_teachers = vec![teacher_b.id.unwrap(), teacher_a.id.unwrap()];
    admin.access_to_students = vec![student.id.unwrap()];
    registry.resolve(Role::Admin).insert(&mut admin).await?;

    let resolved = service.admin_access(admin.id.unwrap()).await?;
    assert_eq!(resolved.access_to_teachers.len(), 2);
    // Resolution preserves the reference list's order
    assert_eq!(resolved.access_to_teachers[0].email, "tb@example.edu");
    assert_eq!(resolved.access_to_teachers[1].email, "ta@example.edu");
    assert_eq!(resolved.access_to_students.len(), 1);
    assert_eq!(resolved.access_to_students[0].email, "s@example.edu");
    Ok(())
}

#[tokio::test]
async fn admin_access_misses_yield_not_found() -> Result<()> {
    let service = DirectoryService::new(registry());
    let err = service.admin_access(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn admin_access_drops_dangling_references() -> Result<()> {
    let registry = registry();
    let service = DirectoryService::new(registry.clone());

    let mut teacher = record("t@example.edu", "555-0201", "pw", Role::Teacher);
    registry.resolve(Role::Teacher).insert(&mut teacher).await?;

    let mut admin = record("admin@example.edu", "555-0401", "pw", Role::Admin);
    admin.access_to_teachers = vec![Uuid::new_v4(), teacher.id.unwrap()];
    registry.resolve(Role::Admin).insert(&mut admin).await?;

    let resolved = service.admin_access(admin.id.unwrap()).await?;
    assert_eq!(resolved.access_to_teachers.len(), 1);
    assert_eq!(resolved.access_to_teachers[0].email, "t@example.edu");
    Ok(())
}

#[tokio::test]
async fn teacher_access_resolves_students_only() -> Result<()> {
    let registry = registry();
    let service = DirectoryService::new(registry.clone());

    let mut student = record("s@example.edu", "555-0301", "pw", Role::Student);
    registry.resolve(Role::Student).insert(&mut student).await?;

    let mut teacher = record("t@example.edu", "555-0201", "pw", Role::Teacher);
    teacher.access_to_students = vec![student.id.unwrap()];
    registry.resolve(Role::Teacher).insert(&mut teacher).await?;

    let resolved = service.teacher_access(teacher.id.unwrap()).await?;
    assert_eq!(resolved.access_to_students.len(), 1);
    assert!(resolved.access_to_teachers.is_empty());

    let err = service.teacher_access(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
    Ok(())
}
