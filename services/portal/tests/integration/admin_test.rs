use bytes::Bytes;
use chrono::Utc;

use guidebook_domain::feedback::FeedbackStatus;
use guidebook_domain::pagination::PageRequest;
use guidebook_portal::domain::repository::FeedbackRepository;
use guidebook_portal::domain::types::{
    DEFAULT_COVER_URL, MediaObject, NewFeedback, Tag, UploadFile,
};
use guidebook_portal::error::PortalError;
use guidebook_portal::usecase::admin_guide::{DeleteGuideUseCase, SaveGuideInput, SaveGuideUseCase};
use guidebook_portal::usecase::ai_polish::AiPolishUseCase;
use guidebook_portal::usecase::codes::{
    AvailableCodesUseCase, GenerateCodesUseCase, ListCodesUseCase,
};
use guidebook_portal::usecase::feedback::UpdateFeedbackStatusUseCase;
use guidebook_portal::usecase::media::{DeleteMediaUseCase, ListMediaUseCase, UploadMediaUseCase};
use guidebook_portal::usecase::seed::{SeedGuideInput, SeedGuideUseCase};
use guidebook_portal::usecase::users::{DashboardUseCase, TogglePaidUseCase};

use crate::helpers::{
    MockAi, MockCategoryRepo, MockCodeRepo, MockFeedbackRepo, MockGuideRepo, MockStorage,
    MockTagRepo, MockUserRepo, SharedStore, STORAGE_HOST, store, test_category, test_code, test_guide,
    test_user,
};

fn upload(name: &str) -> UploadFile {
    UploadFile {
        filename: name.to_owned(),
        content_type: Some("image/png".to_owned()),
        bytes: Bytes::from_static(b"\x89PNG"),
    }
}

// ── activation codes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_generate_batches_of_ten_or_twenty_only() {
    let store = store();
    let uc = GenerateCodesUseCase {
        codes: MockCodeRepo {
            store: store.clone(),
        },
    };

    let ten = uc.execute(10).await.unwrap();
    assert!(ten.len() <= 10);
    assert!(ten.iter().all(|c| c.len() == 8));
    uc.execute(20).await.unwrap();

    for bad in [0, 5, 15, 100] {
        assert!(matches!(
            uc.execute(bad).await,
            Err(PortalError::InvalidBatchSize)
        ));
    }
    let total = store.lock().unwrap().codes.len();
    assert!(total > 20 && total <= 30);
}

#[tokio::test]
async fn should_export_only_unused_codes() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.codes.push(test_code(1, "AAAA0001"));
        let mut used = test_code(2, "AAAA0002");
        used.is_used = true;
        s.codes.push(used);
        s.codes.push(test_code(3, "AAAA0003"));
    }
    let available = AvailableCodesUseCase {
        codes: MockCodeRepo {
            store: store.clone(),
        },
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(available, "AAAA0001\nAAAA0003");

    let page = ListCodesUseCase {
        codes: MockCodeRepo { store },
    }
    .execute(PageRequest::default())
    .await
    .unwrap();
    assert_eq!(page.per_page, 20);
    assert_eq!(page.items[0].id, 3, "newest code first");
}

// ── users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_toggle_membership_and_count_members() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.users.push(test_user(1, "13800000001", false, false));
        s.users.push(test_user(2, "13800000002", true, true));
        s.guides.push(test_guide(1, 1, "g"));
    }
    let toggle = TogglePaidUseCase {
        users: MockUserRepo {
            store: store.clone(),
        },
    };
    assert!(toggle.execute(1).await.unwrap());
    assert!(!toggle.execute(1).await.unwrap());
    assert!(matches!(
        toggle.execute(99).await,
        Err(PortalError::UserNotFound)
    ));

    let stats = DashboardUseCase {
        users: MockUserRepo {
            store: store.clone(),
        },
        guides: MockGuideRepo { store },
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(stats.user_count, 1, "admins are not members");
    assert_eq!(stats.guide_count, 1);
}

// ── feedback ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_feedback_status_within_range() {
    let store = store();
    let feedbacks = MockFeedbackRepo {
        store: store.clone(),
    };
    let created = feedbacks
        .create(&NewFeedback {
            content: "hi".to_owned(),
            contact: None,
            user_id: None,
        })
        .await
        .unwrap();

    let uc = UpdateFeedbackStatusUseCase { feedbacks };
    assert_eq!(
        uc.execute(created.id, 2).await.unwrap(),
        FeedbackStatus::Resolved
    );
    assert_eq!(
        store.lock().unwrap().feedbacks[0].status,
        FeedbackStatus::Resolved
    );
    assert!(matches!(
        uc.execute(created.id, 3).await,
        Err(PortalError::InvalidFeedbackStatus)
    ));
    assert!(matches!(
        uc.execute(999, 1).await,
        Err(PortalError::FeedbackNotFound)
    ));
}

// ── guides ───────────────────────────────────────────────────────────────────

fn save_uc(
    store: &SharedStore,
    storage: MockStorage,
) -> SaveGuideUseCase<MockGuideRepo, MockCategoryRepo, MockStorage> {
    SaveGuideUseCase {
        guides: MockGuideRepo {
            store: store.clone(),
        },
        categories: MockCategoryRepo {
            store: store.clone(),
        },
        storage,
    }
}

fn guide_input(title: &str) -> SaveGuideInput {
    SaveGuideInput {
        title: title.to_owned(),
        content: "# Body".to_owned(),
        category_id: Some(1),
        ..Default::default()
    }
}

#[tokio::test]
async fn should_create_guide_with_default_cover_and_known_tags() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.categories.push(test_category(1, "Sleep"));
        s.tags.push(Tag {
            id: 7,
            name: "calm".to_owned(),
        });
    }
    let uc = save_uc(&store, MockStorage::default());

    let mut input = guide_input("Evening routine");
    input.tag_ids = vec![7, 7, 404];
    let guide = uc.execute(None, input).await.unwrap();

    assert_eq!(guide.cover_image_url.as_deref(), Some(DEFAULT_COVER_URL));
    assert!(guide.is_published, "published by default");
    assert!(!guide.is_featured);
    assert_eq!(store.lock().unwrap().guide_tags, vec![(guide.id, 7)]);
}

#[tokio::test]
async fn should_upload_cover_publicly_into_images() {
    let store = store();
    store
        .lock()
        .unwrap()
        .categories
        .push(test_category(1, "Sleep"));
    let storage = MockStorage::default();
    let uploads = storage.uploads_handle();
    let uc = save_uc(&store, storage);

    let mut input = guide_input("With cover");
    input.cover_image_url = Some("https://ignored.example/x.png".to_owned());
    input.cover_file = Some(upload("cover.png"));
    let guide = uc.execute(None, input).await.unwrap();

    assert_eq!(
        uploads.lock().unwrap().as_slice(),
        &[("images/".to_owned(), "cover.png".to_owned(), false)]
    );
    assert_eq!(
        guide.cover_image_url,
        Some(format!("https://{STORAGE_HOST}/images/cover.png"))
    );
}

#[tokio::test]
async fn should_keep_cover_and_replace_tags_on_edit() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.categories.push(test_category(1, "Sleep"));
        s.tags.push(Tag {
            id: 7,
            name: "calm".to_owned(),
        });
        s.tags.push(Tag {
            id: 8,
            name: "focus".to_owned(),
        });
    }
    let uc = save_uc(&store, MockStorage::default());

    let mut first = guide_input("v1");
    first.cover_image_url = Some("https://cdn.example/c.png".to_owned());
    first.tag_ids = vec![7];
    let created = uc.execute(None, first).await.unwrap();

    let mut second = guide_input("v2");
    second.tag_ids = vec![8];
    second.is_published = Some(false);
    let edited = uc.execute(Some(created.id), second).await.unwrap();

    assert_eq!(edited.title, "v2");
    assert!(!edited.is_published);
    assert_eq!(edited.cover_image_url.as_deref(), Some("https://cdn.example/c.png"));
    assert!(edited.updated_at >= created.updated_at);
    assert_eq!(store.lock().unwrap().guide_tags, vec![(created.id, 8)]);

    assert!(matches!(
        uc.execute(Some(404), guide_input("x")).await,
        Err(PortalError::GuideNotFound)
    ));
}

#[tokio::test]
async fn should_validate_guide_fields() {
    let store = store();
    store
        .lock()
        .unwrap()
        .categories
        .push(test_category(1, "Sleep"));
    let uc = save_uc(&store, MockStorage::default());

    assert!(matches!(
        uc.execute(None, guide_input(" ")).await,
        Err(PortalError::MissingField("title"))
    ));

    let mut no_body = guide_input("t");
    no_body.content = "\n".to_owned();
    assert!(matches!(
        uc.execute(None, no_body).await,
        Err(PortalError::MissingField("content"))
    ));

    let mut bad_category = guide_input("t");
    bad_category.category_id = Some(99);
    assert!(matches!(
        uc.execute(None, bad_category).await,
        Err(PortalError::CategoryNotFound)
    ));
    assert!(store.lock().unwrap().guides.is_empty());
}

#[tokio::test]
async fn should_delete_guide_and_its_memberships() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.guides.push(test_guide(1, 1, "g"));
        s.guide_tags.push((1, 7));
        s.favorites.push((50, 1));
    }
    let uc = DeleteGuideUseCase {
        guides: MockGuideRepo {
            store: store.clone(),
        },
    };
    uc.execute(1).await.unwrap();
    {
        let s = store.lock().unwrap();
        assert!(s.guides.is_empty());
        assert!(s.guide_tags.is_empty());
        assert!(s.favorites.is_empty());
    }
    assert!(matches!(uc.execute(1).await, Err(PortalError::GuideNotFound)));
}

// ── media center ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_route_media_types_to_folders() {
    let mut storage = MockStorage::default();
    storage.objects = vec![
        MediaObject {
            name: "a.png".to_owned(),
            url: "u".to_owned(),
            path: "images/a.png".to_owned(),
            size: 1,
            last_modified: Utc::now(),
        },
        MediaObject {
            name: "b.mp3".to_owned(),
            url: "u".to_owned(),
            path: "audio/b.mp3".to_owned(),
            size: 2,
            last_modified: Utc::now(),
        },
    ];
    let uploads = storage.uploads_handle();

    let list = ListMediaUseCase {
        storage: storage.clone(),
        signed_url_ttl: 1800,
    };
    assert_eq!(list.execute("audio").await.unwrap()[0].name, "b.mp3");
    assert_eq!(list.execute("unknown").await.unwrap()[0].name, "a.png");

    let up = UploadMediaUseCase {
        storage: storage.clone(),
    };
    up.execute("video", upload("clip.mp4")).await.unwrap();
    up.execute("whatever", upload("doc.pdf")).await.unwrap();
    let folders: Vec<String> = uploads.lock().unwrap().iter().map(|u| u.0.clone()).collect();
    assert_eq!(folders, vec!["video/", "material/"]);
}

#[tokio::test]
async fn should_reject_empty_delete_batch() {
    let storage = MockStorage::default();
    let deleted = storage.deleted_handle();
    let uc = DeleteMediaUseCase { storage };

    assert!(matches!(
        uc.execute_batch(vec![]).await,
        Err(PortalError::MissingField("paths"))
    ));
    assert!(matches!(
        uc.execute_batch(vec![" ".to_owned()]).await,
        Err(PortalError::MissingField("paths"))
    ));
    assert_eq!(
        uc.execute_batch(vec!["images/a.png".to_owned(), "audio/b.mp3".to_owned()])
            .await
            .unwrap(),
        2
    );
    uc.execute("material/c.pdf").await.unwrap();
    assert_eq!(deleted.lock().unwrap().len(), 3);
}

// ── AI drafting ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_extract_draft_from_chatty_reply() {
    let ai = MockAi::replying(
        "Here you go:\n{\"summary\": \"Rest well\", \"content\": \"## Why\nSleep matters\"}\nEnjoy!",
    );
    let prompts = ai.prompts.clone();
    let draft = AiPolishUseCase { ai }.execute("Sleep hygiene").await.unwrap();
    assert_eq!(draft.summary, "Rest well");
    assert_eq!(draft.content, "## Why\nSleep matters");
    assert!(prompts.lock().unwrap()[0].contains("Sleep hygiene"));
}

#[tokio::test]
async fn should_report_ai_failures() {
    let blank = AiPolishUseCase {
        ai: MockAi::replying("{}"),
    }
    .execute("  ")
    .await;
    assert!(matches!(blank, Err(PortalError::MissingField("title"))));

    let malformed = AiPolishUseCase {
        ai: MockAi::replying("sorry, no JSON today"),
    }
    .execute("t")
    .await;
    assert!(matches!(malformed, Err(PortalError::AiResponseMalformed)));

    let unavailable = AiPolishUseCase {
        ai: MockAi::unconfigured(),
    }
    .execute("t")
    .await;
    assert!(matches!(unavailable, Err(PortalError::AiUnavailable)));
}

// ── guide seeding ────────────────────────────────────────────────────────────

fn seed_uc(store: &SharedStore, ai: MockAi) -> SeedGuideUseCase<MockCategoryRepo, MockTagRepo, MockGuideRepo, MockAi> {
    SeedGuideUseCase {
        categories: MockCategoryRepo {
            store: store.clone(),
        },
        tags: MockTagRepo {
            store: store.clone(),
        },
        guides: MockGuideRepo {
            store: store.clone(),
        },
        ai,
    }
}

fn seed_input(tags: &[&str]) -> SeedGuideInput {
    SeedGuideInput {
        category: "Emotion care".to_owned(),
        category_description: Some("Living with your feelings".to_owned()),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
    }
}

#[tokio::test]
async fn should_seed_published_guide_creating_taxonomy_once() {
    let store = store();
    let reply = "{\"title\": \"Calm down\", \"summary\": \"Breathe\", \"content\": \"# Calm\nSteps\"}";
    let ai = MockAi::replying(reply);
    let prompts = ai.prompts.clone();
    let uc = seed_uc(&store, ai);

    let first = uc.execute(seed_input(&["anxiety", "growth", "anxiety"])).await.unwrap();
    let second = uc.execute(seed_input(&["anxiety"])).await.unwrap();

    assert_eq!(first.title, "Calm down");
    assert_eq!(first.summary.as_deref(), Some("Breathe"));
    assert_eq!(first.content, "# Calm\nSteps");
    assert!(first.is_published);
    assert_eq!(first.cover_image_url.as_deref(), Some(DEFAULT_COVER_URL));
    assert_eq!(first.category_id, second.category_id);

    let s = store.lock().unwrap();
    assert_eq!(s.categories.len(), 1);
    assert_eq!(s.categories[0].name, "Emotion care");
    assert_eq!(s.categories[0].description.as_deref(), Some("Living with your feelings"));
    assert_eq!(s.tags.len(), 2);
    assert_eq!(s.guides.len(), 2);
    assert_eq!(s.guide_tags.iter().filter(|(g, _)| *g == first.id).count(), 2);
    assert!(prompts.lock().unwrap()[0].contains("anxiety, growth"));
}

#[tokio::test]
async fn should_reuse_existing_category_when_seeding() {
    let store = store();
    store
        .lock()
        .unwrap()
        .categories
        .push(test_category(7, "Emotion care"));
    let uc = seed_uc(
        &store,
        MockAi::replying("{\"title\": \"T\", \"content\": \"body\"}"),
    );

    let guide = uc.execute(seed_input(&[])).await.unwrap();

    assert_eq!(guide.category_id, 7);
    assert_eq!(guide.summary, None);
    assert_eq!(store.lock().unwrap().categories.len(), 1);
}

#[tokio::test]
async fn should_not_store_seed_without_title() {
    let store = store();
    let uc = seed_uc(
        &store,
        MockAi::replying("{\"summary\": \"s\", \"content\": \"body\"}"),
    );

    let result = uc.execute(seed_input(&["anxiety"])).await;

    assert!(matches!(result, Err(PortalError::AiResponseMalformed)));
    assert!(store.lock().unwrap().guides.is_empty());

    let blank = seed_uc(&store, MockAi::replying("{}"))
        .execute(SeedGuideInput {
            category: "  ".to_owned(),
            category_description: None,
            tags: Vec::new(),
        })
        .await;
    assert!(matches!(blank, Err(PortalError::MissingField("category"))));
}
