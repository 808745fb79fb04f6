use guidebook_portal::domain::types::{Tag, UNCATEGORIZED, UNCATEGORIZED_SORT_ORDER};
use guidebook_portal::error::PortalError;
use guidebook_portal::usecase::taxonomy::{
    CreateCategoryInput, CreateCategoryUseCase, CreateTagUseCase, DeleteCategoryUseCase,
    DeleteTagUseCase, ListTaxonomyUseCase,
};

use crate::helpers::{MockCategoryRepo, MockTagRepo, store, test_category, test_guide};

fn category_input(name: &str) -> CreateCategoryInput {
    CreateCategoryInput {
        name: name.to_owned(),
        description: None,
        icon_url: None,
        sort_order: None,
    }
}

#[tokio::test]
async fn should_move_all_guides_to_uncategorized_on_delete() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.categories.push(test_category(1, "Sleep"));
        s.categories.push(test_category(2, "Stress"));
        for id in 1..=4 {
            s.guides.push(test_guide(id, 1, "g"));
        }
        s.guides.push(test_guide(5, 2, "other"));
    }

    let uc = DeleteCategoryUseCase {
        categories: MockCategoryRepo {
            store: store.clone(),
        },
    };
    let moved = uc.execute(1).await.unwrap();
    assert_eq!(moved, 4);

    let s = store.lock().unwrap();
    let reserved = s
        .categories
        .iter()
        .find(|c| c.name == UNCATEGORIZED)
        .expect("reserved category is created on demand");
    assert_eq!(reserved.sort_order, UNCATEGORIZED_SORT_ORDER);
    assert!(!s.categories.iter().any(|c| c.id == 1));
    assert_eq!(
        s.guides.iter().filter(|g| g.category_id == reserved.id).count(),
        4
    );
    assert_eq!(s.guides.len(), 5, "no guide is deleted");
}

#[tokio::test]
async fn should_never_delete_uncategorized() {
    let store = store();
    store
        .lock()
        .unwrap()
        .categories
        .push(test_category(9, UNCATEGORIZED));

    let uc = DeleteCategoryUseCase {
        categories: MockCategoryRepo {
            store: store.clone(),
        },
    };
    assert!(matches!(
        uc.execute(9).await,
        Err(PortalError::ReservedCategory)
    ));
    assert_eq!(store.lock().unwrap().categories.len(), 1);

    assert!(matches!(
        uc.execute(404).await,
        Err(PortalError::CategoryNotFound)
    ));
}

#[tokio::test]
async fn should_ignore_blank_names_and_reject_duplicates() {
    let store = store();
    let categories = CreateCategoryUseCase {
        categories: MockCategoryRepo {
            store: store.clone(),
        },
    };
    assert!(categories.execute(category_input("  ")).await.unwrap().is_none());

    let created = categories
        .execute(category_input(" Sleep "))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.name, "Sleep");
    assert_eq!(created.sort_order, 0);
    assert!(matches!(
        categories.execute(category_input("Sleep")).await,
        Err(PortalError::CategoryAlreadyExists)
    ));

    let tags = CreateTagUseCase {
        tags: MockTagRepo {
            store: store.clone(),
        },
    };
    assert!(tags.execute("").await.unwrap().is_none());
    tags.execute("calm").await.unwrap();
    assert!(matches!(
        tags.execute("calm").await,
        Err(PortalError::TagAlreadyExists)
    ));

    let listing = ListTaxonomyUseCase {
        categories: MockCategoryRepo {
            store: store.clone(),
        },
        tags: MockTagRepo {
            store: store.clone(),
        },
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(listing.categories.len(), 1);
    assert_eq!(listing.tags.len(), 1);
}

#[tokio::test]
async fn should_drop_memberships_with_deleted_tag() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.tags.push(Tag {
            id: 1,
            name: "calm".to_owned(),
        });
        s.guides.push(test_guide(1, 1, "g"));
        s.guide_tags.push((1, 1));
    }
    let uc = DeleteTagUseCase {
        tags: MockTagRepo {
            store: store.clone(),
        },
    };
    uc.execute(1).await.unwrap();
    {
        let s = store.lock().unwrap();
        assert!(s.tags.is_empty());
        assert!(s.guide_tags.is_empty());
        assert_eq!(s.guides.len(), 1);
    }
    assert!(matches!(uc.execute(1).await, Err(PortalError::TagNotFound)));
}
