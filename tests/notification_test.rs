// ==========================================
// 实时通知 / 请假广播集成测试
// ==========================================
// 测试目标: 会话认证与回显、断开注销、请假广播与即时通知开关
// ==========================================

mod test_helpers;
#[path = "helpers/recording_socket.rs"]
mod recording_socket;

use edu_scheduler::domain::leave::LeaveRequest;
use edu_scheduler::domain::settings::Settings;
use edu_scheduler::notify::{ChannelSocket, NotificationSocket, NotifyError, SessionOutcome, CLOSE_UNAUTHORIZED};
use futures::stream;
use recording_socket::RecordingSocket;
use std::sync::Arc;
use test_helpers::{TestEnv, ADMIN_TOKEN, FACULTY_ID, FACULTY_TOKEN, FACULTY_UID, STUDENT_TOKEN, STUDENT_UID};

fn leave_request() -> LeaveRequest {
    LeaveRequest {
        faculty_id: FACULTY_ID.to_string(),
        dates: vec!["2024-10-01".to_string(), "2024-10-02".to_string()],
        reason: Some("conference".to_string()),
    }
}

#[tokio::test]
async fn test_session_rejects_missing_or_invalid_token() {
    let env = TestEnv::new().expect("Failed to create test env");
    let session = &env.state.notification_session;

    for token in [None, Some(""), Some("forged")] {
        let socket = Arc::new(RecordingSocket::new());
        let outcome = session
            .run(token, socket.clone(), stream::iter(vec![Ok("hello".to_string())]))
            .await;
        assert_eq!(
            outcome,
            SessionOutcome::Rejected {
                close_code: CLOSE_UNAUTHORIZED
            }
        );
        assert!(socket.messages().is_empty());
    }
    assert_eq!(env.state.registry.user_count(), 0);
}

#[tokio::test]
async fn test_session_echoes_then_deregisters() {
    let env = TestEnv::new().expect("Failed to create test env");
    let socket = Arc::new(RecordingSocket::new());

    let inbound = stream::iter(vec![Ok("ping".to_string()), Ok("pong".to_string())]);
    let outcome = env
        .state
        .notification_session
        .run(Some(STUDENT_TOKEN), socket.clone(), inbound)
        .await;

    assert_eq!(
        outcome,
        SessionOutcome::Closed {
            user_id: STUDENT_UID.to_string(),
            echoed: 2
        }
    );
    assert_eq!(socket.messages(), vec!["ping", "pong"]);
    assert!(!env.state.registry.is_connected(STUDENT_UID));
}

#[tokio::test]
async fn test_session_ends_on_inbound_error() {
    let env = TestEnv::new().expect("Failed to create test env");
    let socket = Arc::new(RecordingSocket::new());

    let inbound = stream::iter(vec![
        Ok("first".to_string()),
        Err(NotifyError::Closed),
        Ok("never echoed".to_string()),
    ]);
    let outcome = env
        .state
        .notification_session
        .run(Some(STUDENT_TOKEN), socket.clone(), inbound)
        .await;

    assert!(matches!(outcome, SessionOutcome::Closed { echoed: 1, .. }));
    assert_eq!(socket.messages(), vec!["first"]);
    assert_eq!(env.state.registry.user_count(), 0);
}

#[tokio::test]
async fn test_leave_request_broadcasts_to_live_sessions() {
    edu_scheduler::logging::init_test();
    let env = TestEnv::new().expect("Failed to create test env");

    // 两个在线用户（学生两条连接）
    let (student_a, mut rx_a) = ChannelSocket::pair();
    let (student_b, mut rx_b) = ChannelSocket::pair();
    let (admin, mut rx_admin) = ChannelSocket::pair();
    let registry = &env.state.registry;
    registry.connect(STUDENT_UID, Arc::new(student_a));
    registry.connect(STUDENT_UID, Arc::new(student_b));
    registry.connect("admin-1", Arc::new(admin));

    let ack = env
        .state
        .leave_api
        .request_leave(Some(FACULTY_TOKEN), &leave_request())
        .await
        .expect("request leave");

    assert!(ack.submitted);
    assert_eq!(ack.notified, 3);
    let expected = format!("Faculty {} requested leave on 2024-10-01, 2024-10-02", FACULTY_UID);
    assert_eq!(rx_a.recv().await.as_deref(), Some(expected.as_str()));
    assert_eq!(rx_b.recv().await.as_deref(), Some(expected.as_str()));
    assert_eq!(rx_admin.recv().await.as_deref(), Some(expected.as_str()));

    let mine = env.state.leave_api.my_leaves(Some(FACULTY_TOKEN)).await.expect("my leaves");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, ack.leave_id);
    assert_eq!(mine[0].uid, FACULTY_UID);
}

#[tokio::test]
async fn test_broken_socket_is_dropped_after_broadcast() {
    let env = TestEnv::new().expect("Failed to create test env");
    let healthy = Arc::new(RecordingSocket::new());
    let broken = Arc::new(RecordingSocket::new());
    broken.break_connection();

    let registry = &env.state.registry;
    registry.connect(STUDENT_UID, healthy.clone());
    registry.connect("admin-1", broken.clone() as Arc<dyn NotificationSocket>);

    let ack = env
        .state
        .leave_api
        .request_leave(Some(FACULTY_TOKEN), &leave_request())
        .await
        .expect("request leave");

    assert_eq!(ack.notified, 1);
    assert_eq!(healthy.messages().len(), 1);
    assert!(!registry.is_connected("admin-1"));
    assert_eq!(registry.user_count(), 1);
}

#[tokio::test]
async fn test_instant_notify_switch_off_skips_broadcast() {
    let env = TestEnv::new().expect("Failed to create test env");
    env.state
        .settings_api
        .put_settings(
            Some(ADMIN_TOKEN),
            &Settings {
                enable_instant_notify: false,
                ..Settings::default()
            },
        )
        .await
        .expect("put settings");

    let socket = Arc::new(RecordingSocket::new());
    env.state.registry.connect(STUDENT_UID, socket.clone());

    let ack = env
        .state
        .leave_api
        .request_leave(Some(FACULTY_TOKEN), &leave_request())
        .await
        .expect("request leave");

    assert!(ack.submitted);
    assert_eq!(ack.notified, 0);
    assert!(socket.messages().is_empty());
}

#[tokio::test]
async fn test_students_cannot_request_leave() {
    let env = TestEnv::new().expect("Failed to create test env");
    let err = env
        .state
        .leave_api
        .request_leave(Some(STUDENT_TOKEN), &leave_request())
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 403);
}
