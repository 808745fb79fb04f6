use guidebook_portal::domain::types::Redemption;
use guidebook_portal::error::PortalError;
use guidebook_portal::password::verify_password;
use guidebook_portal::usecase::account::{LoginInput, LoginUseCase};
use guidebook_portal::usecase::activation::{
    RegisterAccountInput, RegisterAccountUseCase, ValidateActivationCodeUseCase,
};

use crate::helpers::{MockCodeRepo, MockUserRepo, store, test_code, test_user};

fn register_input(code: &str, phone: &str) -> RegisterAccountInput {
    RegisterAccountInput {
        code: code.to_owned(),
        phone: phone.to_owned(),
        username: "reader".to_owned(),
        password: "pa55word".to_owned(),
    }
}

#[tokio::test]
async fn should_validate_register_and_then_reject_spent_code() {
    let store = store();
    store.lock().unwrap().codes.push(test_code(1, "ABC12345"));

    let validate = ValidateActivationCodeUseCase {
        codes: MockCodeRepo {
            store: store.clone(),
        },
    };
    let found = validate.execute("ABC12345").await.unwrap();
    assert_eq!(found.code, "ABC12345");

    let register = RegisterAccountUseCase {
        codes: MockCodeRepo {
            store: store.clone(),
        },
    };
    let redemption = register
        .execute(register_input("ABC12345", "13800000000"))
        .await
        .unwrap();
    assert!(matches!(redemption, Redemption::Created { .. }));

    {
        let s = store.lock().unwrap();
        let user = s.users.iter().find(|u| u.phone == "13800000000").unwrap();
        assert!(user.is_paid, "registered account must be paid");
        assert!(!user.is_admin);
        assert_ne!(user.password_hash, "pa55word", "password must be hashed");
        assert!(verify_password("pa55word", &user.password_hash));
        assert!(s.codes[0].is_used);
        assert_eq!(s.codes[0].used_by_username.as_deref(), Some("reader"));
    }

    let again = validate.execute("ABC12345").await;
    assert!(
        matches!(again, Err(PortalError::InvalidActivationCode)),
        "expected InvalidActivationCode, got {again:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_code_like_spent_code() {
    let store = store();
    let mut spent = test_code(1, "USED0001");
    spent.is_used = true;
    store.lock().unwrap().codes.push(spent);

    let validate = ValidateActivationCodeUseCase {
        codes: MockCodeRepo { store },
    };
    let unknown = validate.execute("NOPE0000").await.unwrap_err();
    let used = validate.execute("USED0001").await.unwrap_err();
    assert_eq!(unknown.kind(), used.kind());
    assert_eq!(unknown.to_string(), used.to_string());
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_redemption_win() {
    let store = store();
    store.lock().unwrap().codes.push(test_code(1, "RACE0001"));

    let uc = |phone: &'static str| {
        let codes = MockCodeRepo {
            store: store.clone(),
        };
        async move {
            RegisterAccountUseCase { codes }
                .execute(register_input("RACE0001", phone))
                .await
        }
    };
    let (a, b, c) = tokio::join!(uc("13800000001"), uc("13800000002"), uc("13800000003"));

    let results = [a, b, c];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one redemption must succeed");
    for r in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(r, Err(PortalError::InvalidActivationCode)));
    }
    assert_eq!(store.lock().unwrap().users.len(), 1);
}

#[tokio::test]
async fn should_upgrade_existing_account_with_same_phone() {
    let store = store();
    {
        let mut s = store.lock().unwrap();
        s.users.push(test_user(7, "13911112222", false, false));
        s.codes.push(test_code(1, "UPGR0001"));
    }

    let register = RegisterAccountUseCase {
        codes: MockCodeRepo {
            store: store.clone(),
        },
    };
    let redemption = register
        .execute(register_input("UPGR0001", "13911112222"))
        .await
        .unwrap();
    assert_eq!(redemption, Redemption::Upgraded { user_id: 7 });

    let s = store.lock().unwrap();
    assert_eq!(s.users.len(), 1);
    assert!(s.users[0].is_paid);
    assert_eq!(s.codes[0].used_by_username.as_deref(), Some("user7"));
}

#[tokio::test]
async fn should_reject_bad_phone_before_any_lookup() {
    let store = store();
    store.lock().unwrap().codes.push(test_code(1, "PHON0001"));

    let register = RegisterAccountUseCase {
        codes: MockCodeRepo {
            store: store.clone(),
        },
    };
    for phone in ["12800000000", "1380000000", "138000000000", "abc", ""] {
        let result = register.execute(register_input("PHON0001", phone)).await;
        assert!(
            matches!(result, Err(PortalError::InvalidPhone)),
            "{phone:?} should be rejected, got {result:?}"
        );
    }

    let s = store.lock().unwrap();
    assert_eq!(s.calls, 0, "no repository call may happen for a bad phone");
    assert!(!s.codes[0].is_used);
}

#[tokio::test]
async fn should_require_username_and_password() {
    let register = RegisterAccountUseCase {
        codes: MockCodeRepo { store: store() },
    };
    let mut input = register_input("X", "13800000000");
    input.username = "  ".to_owned();
    assert!(matches!(
        register.execute(input).await,
        Err(PortalError::MissingField("username"))
    ));

    let mut input = register_input("X", "13800000000");
    input.password = String::new();
    assert!(matches!(
        register.execute(input).await,
        Err(PortalError::MissingField("password"))
    ));
}

#[tokio::test]
async fn should_login_with_phone_and_password() {
    let store = store();
    store
        .lock()
        .unwrap()
        .users
        .push(test_user(3, "13700000000", true, false));
    let uc = LoginUseCase {
        users: MockUserRepo {
            store: store.clone(),
        },
    };

    let user = uc
        .execute(LoginInput {
            phone: "13700000000".to_owned(),
            password: "secret-pw".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, 3);
    assert!(store.lock().unwrap().users[0].last_login.is_some());

    let wrong = uc
        .execute(LoginInput {
            phone: "13700000000".to_owned(),
            password: "nope".to_owned(),
        })
        .await;
    assert!(matches!(wrong, Err(PortalError::InvalidCredentials)));

    let unknown = uc
        .execute(LoginInput {
            phone: "13700000001".to_owned(),
            password: "secret-pw".to_owned(),
        })
        .await;
    assert!(matches!(unknown, Err(PortalError::InvalidCredentials)));
}
