use guidebook_domain::pagination::PageRequest;
use guidebook_portal::domain::types::{FavoriteAction, GuideFilter, Tag};
use guidebook_portal::error::PortalError;
use guidebook_portal::usecase::favorite::{ProfileUseCase, ToggleFavoriteUseCase};
use guidebook_portal::usecase::feedback::{SubmitFeedbackInput, SubmitFeedbackUseCase};
use guidebook_portal::usecase::guide::{LikeGuideUseCase, ListGuidesUseCase, ShowGuideUseCase};

use crate::helpers::{
    MockCategoryRepo, MockFavoriteRepo, MockFeedbackRepo, MockGuideRepo, MockStorage,
    MockTagRepo, SharedStore, store, test_category, test_guide, test_user,
};

fn seeded() -> SharedStore {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.categories.push(test_category(1, "Sleep"));
        s.categories.push(test_category(2, "Stress"));
        s.tags.push(Tag {
            id: 10,
            name: "beginner".to_owned(),
        });
        let mut a = test_guide(1, 1, "Falling asleep faster");
        a.summary = Some("evening routine".to_owned());
        let b = test_guide(2, 1, "Night waking");
        let c = test_guide(3, 2, "Breathing at work");
        let mut hidden = test_guide(4, 1, "Draft about sleep");
        hidden.is_published = false;
        s.guides.extend([a, b, c, hidden]);
        s.guide_tags.push((1, 10));
        s.guide_tags.push((3, 10));
        s.users.push(test_user(50, "13800000050", true, false));
    }
    store
}

fn list_uc(store: &SharedStore) -> ListGuidesUseCase<MockGuideRepo, MockCategoryRepo, MockTagRepo, MockStorage> {
    ListGuidesUseCase {
        guides: MockGuideRepo {
            store: store.clone(),
        },
        categories: MockCategoryRepo {
            store: store.clone(),
        },
        tags: MockTagRepo {
            store: store.clone(),
        },
        storage: MockStorage::default(),
        signed_url_ttl: 1800,
    }
}

#[tokio::test]
async fn should_list_only_published_guides_newest_first() {
    let store = seeded();
    let listing = list_uc(&store)
        .execute(GuideFilter::default(), PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<i32> = listing.guides.items.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(listing.guides.total, 3);
    assert_eq!(listing.guides.per_page, 10);
    assert_eq!(listing.categories.len(), 2);
    assert_eq!(listing.tags.len(), 1);
}

#[tokio::test]
async fn should_filter_by_tag_category_and_text() {
    let store = seeded();
    let uc = list_uc(&store);

    let tagged = uc
        .execute(
            GuideFilter {
                tag_id: Some(10),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    let ids: Vec<i32> = tagged.guides.items.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![3, 1], "only guides tagged 10");

    let both = uc
        .execute(
            GuideFilter {
                tag_id: Some(10),
                category_id: Some(1),
                q: None,
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(both.guides.items.len(), 1);
    assert_eq!(both.guides.items[0].id, 1);

    let by_summary = uc
        .execute(
            GuideFilter {
                q: Some("  routine ".to_owned()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_summary.guides.items.len(), 1);
    assert_eq!(by_summary.guides.items[0].id, 1);
    assert_eq!(by_summary.filter.q.as_deref(), Some("routine"));

    let by_title = uc
        .execute(
            GuideFilter {
                q: Some("Breathing".to_owned()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_title.guides.items[0].id, 3);
}

#[tokio::test]
async fn should_increase_likes_by_exactly_two_when_liked_twice() {
    let store = seeded();
    let uc = LikeGuideUseCase {
        guides: MockGuideRepo {
            store: store.clone(),
        },
    };
    assert_eq!(uc.execute(2).await.unwrap(), 1);
    assert_eq!(uc.execute(2).await.unwrap(), 2);
    assert_eq!(store.lock().unwrap().guides[1].like_count, 2);

    assert!(matches!(
        uc.execute(999).await,
        Err(PortalError::GuideNotFound)
    ));
}

#[tokio::test]
async fn should_return_to_original_state_after_two_toggles() {
    let store = seeded();
    let uc = ToggleFavoriteUseCase {
        guides: MockGuideRepo {
            store: store.clone(),
        },
        favorites: MockFavoriteRepo {
            store: store.clone(),
        },
    };

    assert_eq!(uc.execute(50, 1).await.unwrap(), FavoriteAction::Favorited);
    assert_eq!(store.lock().unwrap().favorites, vec![(50, 1)]);
    assert_eq!(uc.execute(50, 1).await.unwrap(), FavoriteAction::Unfavorited);
    assert!(store.lock().unwrap().favorites.is_empty());

    assert!(matches!(
        uc.execute(50, 999).await,
        Err(PortalError::GuideNotFound)
    ));
}

#[tokio::test]
async fn should_show_guide_with_signed_links_and_count_the_view() {
    let store = seeded();
    {
        let mut s = store.lock().unwrap();
        s.guides[0].content =
            "See ![x](https://bucket.example.com/images/x.png) and https://other.com/a.png."
                .to_owned();
        s.guides[0].cover_image_url = Some("https://bucket.example.com/images/c.png".to_owned());
        s.favorites.push((50, 1));
    }
    let uc = ShowGuideUseCase {
        guides: MockGuideRepo {
            store: store.clone(),
        },
        categories: MockCategoryRepo {
            store: store.clone(),
        },
        tags: MockTagRepo {
            store: store.clone(),
        },
        favorites: MockFavoriteRepo {
            store: store.clone(),
        },
        storage: MockStorage::default(),
        signed_url_ttl: 1800,
    };

    let detail = uc.execute(1, 50).await.unwrap();
    assert_eq!(detail.guide.view_count, 1, "view is counted before rendering");
    assert!(detail
        .guide
        .content
        .contains("https://bucket.example.com/images/x.png?signed"));
    assert!(detail.guide.content.contains("https://other.com/a.png."));
    assert!(detail.content_html.contains("<img"));
    assert_eq!(
        detail.guide.cover_image_url.as_deref(),
        Some("https://bucket.example.com/images/c.png?signed")
    );
    assert_eq!(detail.category_name.as_deref(), Some("Sleep"));
    assert_eq!(detail.tags.len(), 1);
    assert!(detail.is_favorite);
    // Guide 2 shares the category; 3 is elsewhere and 4 is unpublished.
    let related: Vec<i32> = detail.related.iter().map(|g| g.id).collect();
    assert_eq!(related, vec![2]);

    assert!(matches!(
        uc.execute(999, 50).await,
        Err(PortalError::GuideNotFound)
    ));
}

#[tokio::test]
async fn should_keep_foreign_cover_urls_in_listing() {
    let store = seeded();
    {
        let mut s = store.lock().unwrap();
        s.guides[0].cover_image_url = Some("https://images.unsplash.com/photo-1.jpg".to_owned());
        s.guides[1].cover_image_url = Some("https://bucket.example.com/images/b.png".to_owned());
    }
    let listing = list_uc(&store)
        .execute(GuideFilter::default(), PageRequest::default())
        .await
        .unwrap();

    let cover = |id: i32| {
        listing
            .guides
            .items
            .iter()
            .find(|g| g.id == id)
            .and_then(|g| g.cover_image_url.clone())
    };
    assert_eq!(cover(1).as_deref(), Some("https://images.unsplash.com/photo-1.jpg"));
    assert_eq!(cover(2).as_deref(), Some("https://bucket.example.com/images/b.png?signed"));
}

#[tokio::test]
async fn should_show_favorites_on_profile() {
    let store = seeded();
    store.lock().unwrap().favorites.push((50, 3));
    let user = store.lock().unwrap().users[0].clone();

    let uc = ProfileUseCase {
        favorites: MockFavoriteRepo {
            store: store.clone(),
        },
        storage: MockStorage::default(),
        signed_url_ttl: 1800,
    };
    let profile = uc.execute(user).await.unwrap();
    assert_eq!(profile.user.id, 50);
    assert_eq!(profile.favorites.len(), 1);
    assert_eq!(profile.favorites[0].id, 3);
}

#[tokio::test]
async fn should_require_feedback_content() {
    let store = seeded();
    let uc = SubmitFeedbackUseCase {
        feedbacks: MockFeedbackRepo {
            store: store.clone(),
        },
    };

    let blank = uc
        .execute(SubmitFeedbackInput {
            content: "   ".to_owned(),
            contact: None,
            user_id: Some(50),
        })
        .await;
    assert!(matches!(blank, Err(PortalError::MissingField("content"))));

    let saved = uc
        .execute(SubmitFeedbackInput {
            content: "More audio please".to_owned(),
            contact: Some(" ".to_owned()),
            user_id: Some(50),
        })
        .await
        .unwrap();
    assert_eq!(saved.user_id, Some(50));
    assert!(saved.contact.is_none());
    assert_eq!(store.lock().unwrap().feedbacks.len(), 1);
}
