use super::*;

/// Tests creating a robot from a minimal form.
///
/// Expected: Ok with slug derived from the name, published status and creator stamps
#[tokio::test]
async fn creates_published_robot_with_slug() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;

    let robot = RobotService::new(db, &storage)
        .create(robot_form("Foo", "Acme"), editor.id)
        .await?;

    assert_eq!(robot.slug, "foo");
    assert_eq!(robot.manufacturer.name, "Acme");
    assert_eq!(robot.status, RobotStatus::Published);
    assert_eq!(robot.created_by, Some(editor.id));
    assert_eq!(robot.updated_by, Some(editor.id));

    Ok(())
}

/// Tests creating a second robot whose name maps to an existing slug.
///
/// Expected: Err(AppError::BadRequest) and only one stored robot
#[tokio::test]
async fn rejects_duplicate_slug() -> Result<(), AppError> {
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

    service.create(robot_form("Foo", "Acme"), editor.id).await?;
    let result = service.create(robot_form("foo", "Other"), editor.id).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(RobotRepository::new(db).count(None).await?, 1);

    Ok(())
}

/// Tests that name and manufacturer are both reported when missing.
///
/// Expected: Err(AppError::Validation) naming both fields
#[tokio::test]
async fn requires_name_and_manufacturer() -> Result<(), AppError> {
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
        .create(RobotForm::default(), editor.id)
        .await;

    let errors = match result {
        Err(AppError::Validation(errors)) => errors,
        other => panic!("expected validation error, got {:?}", other),
    };
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "manufacturer"]);

    Ok(())
}

/// Tests that review ratings outside 1 to 5 are rejected.
///
/// Expected: Err(AppError::Validation) for `reviews`
#[tokio::test]
async fn rejects_out_of_range_rating() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;

    let mut form = robot_form("Foo", "Acme");
    form.input.reviews = Some(vec![ReviewDto {
        rating: 6,
        ..Default::default()
    }]);

    let result = RobotService::new(db, &storage)
        .create(form, editor.id)
        .await;

    let errors = match result {
        Err(AppError::Validation(errors)) => errors,
        other => panic!("expected validation error, got {:?}", other),
    };
    assert_eq!(errors[0].field, "reviews");

    Ok(())
}

/// Tests that submitted ratings below 1 or far above 5 reach validation.
///
/// Both values are bound from a JSON-encoded `reviews` field, as a form would send them.
///
/// Expected: Err(AppError::Validation) for `reviews` and no stored robot
#[tokio::test]
async fn rejects_negative_and_oversized_ratings() -> Result<(), AppError> {
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

    for rating in ["-1", "300"] {
        let body = serde_json::json!({
            "name": format!("Foo {}", rating),
            "manufacturer": "Acme",
            "reviews": format!(r#"[{{"rating":{},"content":"ok"}}]"#, rating),
        });
        let serde_json::Value::Object(body) = body else {
            unreachable!("json! object literal")
        };
        let form = RobotForm::from_json(body)?;

        let errors = match service.create(form, editor.id).await {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error for {}, got {:?}", rating, other),
        };
        assert_eq!(errors[0].field, "reviews");
    }

    assert_eq!(RobotRepository::new(db).count(None).await?, 0);

    Ok(())
}

/// Tests storing uploaded featured and gallery images.
///
/// Expected: Ok with upload URLs whose files exist, featured alt/caption overridden
#[tokio::test]
async fn stores_uploaded_images() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;

    let mut form = robot_form("Atlas", "Boston Dynamics");
    form.featured_image_file = Some(upload("atlas.PNG", "image/png"));
    form.featured_image_caption = Some("Atlas in the lab".to_string());
    form.image_files.push(upload("side.jpg", "image/jpeg"));
    form.video_files.push(upload("demo.mp4", "video/mp4"));

    let robot = RobotService::new(db, &storage)
        .create(form, editor.id)
        .await?;

    let featured = robot.featured_image.clone().unwrap();
    assert!(featured.url.starts_with("/uploads/robots/images/"));
    assert!(featured.url.ends_with(".png"));
    assert_eq!(featured.alt, "Atlas");
    assert_eq!(featured.caption, "Atlas in the lab");
    assert_eq!(robot.images.len(), 1);
    assert_eq!(robot.videos.len(), 1);
    assert!(robot.videos[0].url.starts_with("/uploads/robots/videos/"));

    for url in robot.media_urls() {
        assert!(stored_path(&storage, &url).exists(), "missing {}", url);
    }

    Ok(())
}

/// Tests that a non-image file sent as an image is rejected before storing anything.
///
/// Expected: Err(AppError::Validation) and an empty upload directory
#[tokio::test]
async fn rejects_wrong_upload_type() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let editor = user_with_role(db, "editor").await?;

    let mut form = robot_form("Foo", "Acme");
    form.image_files.push(upload("notes.txt", "text/plain"));

    let result = RobotService::new(db, &storage)
        .create(form, editor.id)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(!dir.path().join("robots").exists());

    Ok(())
}
