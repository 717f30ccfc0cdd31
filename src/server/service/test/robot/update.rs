use super::*;

/// Tests that renaming a robot regenerates its slug.
///
/// Expected: Ok with slug `foo-bar` and the admin stamped as last updater
#[tokio::test]
async fn rename_regenerates_slug() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let author = user_with_role(db, "editor").await?;
    let admin = user_with_role(db, "admin").await?;
    let service = RobotService::new(db, &storage);

    let robot = service.create(robot_form("Foo", "Acme"), author.id).await?;

    let mut form = RobotForm::default();
    form.input.name = Some("Foo Bar".to_string());
    let updated = service.update(robot.id, form, false, admin.id).await?;

    assert_eq!(updated.slug, "foo-bar");
    assert_eq!(updated.name, "Foo Bar");
    assert_eq!(updated.manufacturer.name, "Acme");
    assert_eq!(updated.created_by, Some(author.id));
    assert_eq!(updated.updated_by, Some(admin.id));

    Ok(())
}

/// Tests renaming to a name whose slug belongs to another robot.
///
/// Expected: Ok with the new name and the old slug kept
#[tokio::test]
async fn rename_keeps_slug_when_taken() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;
    let service = RobotService::new(db, &storage);

    RobotFactory::new(db)
        .name("Bar")
        .slug("bar")
        .build()
        .await?;
    let robot = service.create(robot_form("Foo", "Acme"), editor.id).await?;

    let mut form = RobotForm::default();
    form.input.name = Some("Bar".to_string());
    let updated = service.update(robot.id, form, false, editor.id).await?;

    assert_eq!(updated.name, "Bar");
    assert_eq!(updated.slug, "foo");

    Ok(())
}

/// Tests that a manufacturer update without a name keeps the stored name.
///
/// Expected: Ok with the old manufacturer name and the new country
#[tokio::test]
async fn merges_manufacturer_fields() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;

    let robot = RobotFactory::new(db)
        .manufacturer("Acme Robotics")
        .build()
        .await?;

    let mut form = RobotForm::default();
    form.input.manufacturer = Some(ManufacturerDto {
        name: String::new(),
        country: Some("Japan".to_string()),
        website: None,
    });
    let updated = RobotService::new(db, &storage)
        .update(robot.id, form, false, editor.id)
        .await?;

    assert_eq!(updated.manufacturer.name, "Acme Robotics");
    assert_eq!(updated.manufacturer.country.as_deref(), Some("Japan"));

    Ok(())
}

/// Tests that uploaded gallery images are appended by default.
///
/// Expected: Ok with the existing image followed by the upload
#[tokio::test]
async fn appends_gallery_uploads() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;

    let robot = RobotFactory::new(db)
        .images(&["https://img.example/a.jpg"])
        .build()
        .await?;

    let mut form = RobotForm::default();
    form.image_files.push(upload("b.jpg", "image/jpeg"));
    let updated = RobotService::new(db, &storage)
        .update(robot.id, form, false, editor.id)
        .await?;

    assert_eq!(updated.images.len(), 2);
    assert_eq!(updated.images[0].url, "https://img.example/a.jpg");
    assert!(updated.images[1].url.starts_with("/uploads/robots/images/"));

    Ok(())
}

/// Tests replacing the gallery with the uploaded images.
///
/// Expected: Ok with only the upload left and the replaced upload's file removed
#[tokio::test]
async fn replaces_gallery_when_requested() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;
    let service = RobotService::new(db, &storage);

    let mut form = robot_form("Foo", "Acme");
    form.image_files.push(upload("old.jpg", "image/jpeg"));
    let robot = service.create(form, editor.id).await?;
    let old_url = robot.images[0].url.clone();

    let mut form = RobotForm::default();
    form.image_files.push(upload("new.jpg", "image/jpeg"));
    let updated = service.update(robot.id, form, true, editor.id).await?;

    assert_eq!(updated.images.len(), 1);
    assert_ne!(updated.images[0].url, old_url);
    assert!(!stored_path(&storage, &old_url).exists());
    assert!(stored_path(&storage, &updated.images[0].url).exists());

    Ok(())
}

/// Tests updating a robot that does not exist.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_unknown_robot() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;

    let result = RobotService::new(db, &storage)
        .update(9999, robot_form("Foo", "Acme"), false, editor.id)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
