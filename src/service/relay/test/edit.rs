use super::*;

/// Tests that an edit updates every relayed copy.
///
/// Expected: Edited with one call per copy and the new content
#[tokio::test]
async fn edits_every_copy() {
    let relay = relay(vec![group(1, &[10, 11, 12])]);
    let dispatcher = RecordingDispatcher::new();
    relay
        .service
        .relay_message(&dispatcher, &inbound(10, 1, "ahoj"))
        .await;
    let relayed = relay.correlations.get(origin(10, 1)).await.unwrap();

    let outcome = relay
        .service
        .relay_edit(&dispatcher, &edit(10, 1, "ahoj všichni"))
        .await;

    assert_eq!(
        outcome,
        RelayOutcome::Edited {
            updated: 2,
            failed: 0
        }
    );
    let edits = dispatcher.edits();
    assert_eq!(edits.len(), 2);
    for call in edits {
        let DispatchCall::Edit {
            channel_id,
            message_id,
            content,
        } = call
        else {
            unreachable!();
        };
        assert_eq!(
            relayed.destinations.get(&channel_id),
            Some(&vec![message_id])
        );
        assert_eq!(content, "**cvut_fel Ferda:** ahoj všichni");
    }
}

/// Tests an edit of a message outside any wormhole channel.
///
/// Expected: NotCorrelated, no dispatch and nothing kept
#[tokio::test]
async fn ignores_edit_without_correlation() {
    let relay = relay(vec![group(1, &[10, 11])]);
    let dispatcher = RecordingDispatcher::new();

    let outcome = relay
        .service
        .relay_edit(&dispatcher, &edit(99, 1, "changed"))
        .await;

    assert_eq!(outcome, RelayOutcome::NotCorrelated);
    assert!(dispatcher.calls().is_empty());
    assert!(relay.correlations.is_empty());
}

/// Tests that a copy which can no longer be edited is forgotten.
///
/// Expected: first edit fails for the channel, second edit skips it
#[tokio::test]
async fn forgets_unavailable_copy() {
    let relay = relay(vec![group(1, &[10, 11, 12])]);
    let dispatcher = RecordingDispatcher::new();
    relay
        .service
        .relay_message(&dispatcher, &inbound(10, 1, "ahoj"))
        .await;
    dispatcher.fail_channel(
        ChannelId::new(12),
        DispatchError::DestinationUnavailable("Unknown Message (404)".to_string()),
    );

    let first = relay
        .service
        .relay_edit(&dispatcher, &edit(10, 1, "edit 1"))
        .await;
    let second = relay
        .service
        .relay_edit(&dispatcher, &edit(10, 1, "edit 2"))
        .await;

    assert_eq!(
        first,
        RelayOutcome::Edited {
            updated: 1,
            failed: 1
        }
    );
    assert_eq!(
        second,
        RelayOutcome::Edited {
            updated: 1,
            failed: 0
        }
    );
    let relayed = relay.correlations.get(origin(10, 1)).await.unwrap();
    assert_eq!(
        relayed.destinations.keys().copied().collect::<Vec<_>>(),
        vec![ChannelId::new(11)]
    );
}

/// Tests that an edit keeps attachment links, reply quote and identity of the relay.
///
/// Expected: only the content changes in the edited copy
#[tokio::test]
async fn keeps_attachments_and_reply_on_edit() {
    let relay = relay(vec![group(1, &[10, 11])]);
    let dispatcher = RecordingDispatcher::new();
    let mut message = inbound(10, 1, "ahoj");
    message.reply_to = Some("otázka".to_string());
    message.attachments = vec![AttachmentRef {
        filename: "SPOILER_a.png".to_string(),
        url: "https://cdn.example/a.png".to_string(),
        spoiler: true,
        size: 64 * 1024 * 1024,
    }];
    relay.service.relay_message(&dispatcher, &message).await;

    relay
        .service
        .relay_edit(&dispatcher, &edit(10, 1, "ahoj!"))
        .await;

    let DispatchCall::Edit { content, .. } = &dispatcher.edits()[0] else {
        unreachable!();
    };
    assert_eq!(
        content,
        "> otázka\n**cvut_fel Ferda:** ahoj!\n||https://cdn.example/a.png||"
    );
}

/// Tests an edit that makes a short copy longer than one Discord message.
///
/// Expected: the first part is edited, the continuation posted as a new message and
/// recorded
#[tokio::test]
async fn posts_new_part_when_edit_grows() {
    let relay = relay(vec![group(1, &[10, 11])]);
    let dispatcher = RecordingDispatcher::new();
    relay
        .service
        .relay_message(&dispatcher, &inbound(10, 1, "krátce"))
        .await;

    let outcome = relay
        .service
        .relay_edit(&dispatcher, &edit(10, 1, &"dlouze ".repeat(400)))
        .await;

    assert_eq!(
        outcome,
        RelayOutcome::Edited {
            updated: 1,
            failed: 0
        }
    );
    assert_eq!(dispatcher.edits().len(), 1);
    let contents = dispatcher.sent_contents(ChannelId::new(11));
    assert_eq!(contents.len(), 2);
    assert!(contents[1].starts_with(CONTINUATION_MARK));

    let relayed = relay.correlations.get(origin(10, 1)).await.unwrap();
    assert_eq!(relayed.destinations[&ChannelId::new(11)].len(), 2);
}

/// Tests an edit that makes a long copy fit in one Discord message.
///
/// Expected: the first part is edited, the surplus part deleted and forgotten
#[tokio::test]
async fn deletes_surplus_part_when_edit_shrinks() {
    let relay = relay(vec![group(1, &[10, 11])]);
    let dispatcher = RecordingDispatcher::new();
    relay
        .service
        .relay_message(&dispatcher, &inbound(10, 1, &"dlouze ".repeat(400)))
        .await;
    let parts = relay.correlations.get(origin(10, 1)).await.unwrap().destinations
        [&ChannelId::new(11)]
        .clone();
    assert_eq!(parts.len(), 2);

    relay
        .service
        .relay_edit(&dispatcher, &edit(10, 1, "krátce"))
        .await;

    assert_eq!(
        dispatcher.edits(),
        vec![DispatchCall::Edit {
            channel_id: ChannelId::new(11),
            message_id: parts[0],
            content: "**cvut_fel Ferda:** krátce".to_string(),
        }]
    );
    assert_eq!(
        dispatcher.deletes(),
        vec![DispatchCall::Delete {
            channel_id: ChannelId::new(11),
            message_id: parts[1],
        }]
    );
    let relayed = relay.correlations.get(origin(10, 1)).await.unwrap();
    assert_eq!(relayed.destinations[&ChannelId::new(11)], vec![parts[0]]);
}

/// Tests an edit of a message whose correlation was pruned.
///
/// Expected: NotCorrelated and no dispatch
#[tokio::test(start_paused = true)]
async fn ignores_edit_after_eviction() {
    let relay = relay(vec![group(1, &[10, 11])]);
    let dispatcher = RecordingDispatcher::new();
    relay
        .service
        .relay_message(&dispatcher, &inbound(10, 1, "ahoj"))
        .await;

    tokio::time::advance(Duration::from_secs(7200)).await;
    assert_eq!(relay.correlations.prune(), 1);

    let outcome = relay
        .service
        .relay_edit(&dispatcher, &edit(10, 1, "changed"))
        .await;

    assert_eq!(outcome, RelayOutcome::NotCorrelated);
    assert!(dispatcher.edits().is_empty());
}
