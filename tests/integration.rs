#[cfg(test)]
mod integration_tests {
    use parley::{
        ChatConfig, ConversationLine, Error, SecureChat, SeedParticipant, StoreEvent,
        UNABLE_TO_DECRYPT, digest,
    };
    use std::sync::{Arc, Mutex};

    fn chat_with(names: &[(&str, &str, &str)]) -> SecureChat {
        let config = ChatConfig {
            seed_participants: names
                .iter()
                .map(|(id, name, secret)| SeedParticipant::new(id, name, secret))
                .collect(),
            ..ChatConfig::default()
        };
        SecureChat::new(config).unwrap()
    }

    #[test]
    fn test_full_chat_flow() {
        println!("Step 1: Starting the core with three participants...");
        let chat = chat_with(&[
            ("1", "alice", "pw-a"),
            ("2", "bob", "pw-b"),
            ("3", "carol", "pw-c"),
        ]);

        println!("Step 2: Bob's chat window subscribes to the store...");
        let refreshes = Arc::new(Mutex::new(Vec::new()));
        {
            let store = Arc::clone(chat.store());
            let refreshes = Arc::clone(&refreshes);
            chat.store().subscribe(move |event| {
                let StoreEvent::Appended { index } = *event;
                let total = store.all_messages().len();
                refreshes.lock().unwrap().push((index, total));
                Ok(())
            });
        }

        println!("Step 3: Alice and Bob log in...");
        let alice = chat.login("alice", "pw-a").unwrap();
        let bob = chat.login("bob", "pw-b").unwrap();
        let carol = chat.registry().find_by_id("3").unwrap();
        assert_eq!(chat.login("alice", "pw-b").unwrap_err(), Error::CredentialMismatch);

        println!("Step 4: Alice picks Bob from her contacts and sends a message...");
        let contacts: Vec<String> = chat
            .registry()
            .contacts_for(&alice)
            .iter()
            .map(|p| p.display_name().to_string())
            .collect();
        assert_eq!(contacts, ["bob", "carol"]);
        let m1 = chat.gateway().send(&alice, &bob, "Hey Bob, lunch?").unwrap();

        println!("Step 5: Bob replies...");
        let m2 = chat.gateway().send(&bob, &alice, "Sure, noon 🍜").unwrap();

        println!("Step 6: Store ordering and notifications...");
        let all = chat.store().all_messages();
        assert_eq!(all.len(), 2);
        assert!(Arc::ptr_eq(&all[0], &m1));
        assert!(Arc::ptr_eq(&all[1], &m2));
        assert_eq!(*refreshes.lock().unwrap(), vec![(0, 1), (1, 2)]);

        println!("Step 7: Only the receiver can read a message...");
        assert_eq!(chat.gateway().render(&m1, &bob), "Hey Bob, lunch?");
        assert_eq!(chat.gateway().render(&m1, &alice), m1.ciphertext());
        assert_eq!(chat.gateway().render(&m1, &carol), m1.ciphertext());
        assert_eq!(chat.gateway().render(&m2, &alice), "Sure, noon 🍜");

        println!("Step 8: Conversation views...");
        assert_eq!(
            chat.gateway().conversation_for(&bob),
            vec![
                ConversationLine::Incoming {
                    sender: "alice".to_string(),
                    text: "Hey Bob, lunch?".to_string()
                },
                ConversationLine::Outgoing {
                    receiver: "alice".to_string(),
                    text: "Sure, noon 🍜".to_string()
                },
            ]
        );
        assert!(chat.gateway().conversation_for(&carol).is_empty());
    }

    #[test]
    fn test_message_larger_than_key_capacity_is_refused() {
        let chat = chat_with(&[("1", "alice", "a"), ("2", "bob", "b")]);
        let alice = chat.login("alice", "a").unwrap();
        let bob = chat.login("bob", "b").unwrap();

        assert!(chat.gateway().send(&alice, &bob, &"z".repeat(245)).is_ok());
        assert!(matches!(
            chat.gateway().send(&alice, &bob, &"z".repeat(246)),
            Err(Error::Encryption(_))
        ));
        assert_eq!(chat.store().len(), 1);
    }

    #[test]
    fn test_same_text_to_two_receivers_differs() {
        let chat = chat_with(&[("1", "alice", "a"), ("2", "bob", "b"), ("3", "carol", "c")]);
        let alice = chat.login("alice", "a").unwrap();
        let bob = chat.registry().find_by_display_name("bob").unwrap();
        let carol = chat.registry().find_by_display_name("carol").unwrap();

        let to_bob = chat.gateway().send(&alice, &bob, "same text").unwrap();
        let to_carol = chat.gateway().send(&alice, &carol, "same text").unwrap();

        assert_ne!(to_bob.ciphertext(), to_carol.ciphertext());
        // Bob addressed by name cannot read Carol's copy.
        assert_eq!(chat.gateway().render(&to_carol, &bob), to_carol.ciphertext());
    }

    #[test]
    fn test_duplicate_display_name_receiver_sees_sentinel() {
        let chat = chat_with(&[("1", "alice", "a"), ("2", "bob", "b")]);
        let alice = chat.login("alice", "a").unwrap();
        let bob = chat.login("bob", "b").unwrap();
        let second_bob = chat.registry().register("7", "bob", "other").unwrap();

        assert!(Arc::ptr_eq(&chat.registry().find_by_display_name("bob").unwrap(), &bob));

        let message = chat.gateway().send(&alice, &bob, "for the first bob").unwrap();
        assert_eq!(chat.gateway().render(&message, &bob), "for the first bob");
        assert_eq!(chat.gateway().render(&message, &second_bob), UNABLE_TO_DECRYPT);
    }

    #[test]
    fn test_registration_broadcasts_to_participant_lists() {
        let chat = chat_with(&[]);
        let registered = Arc::new(Mutex::new(Vec::new()));
        {
            let registry = Arc::clone(chat.registry());
            let registered = Arc::clone(&registered);
            chat.registry().subscribe(move |_| {
                let names: Vec<String> = registry
                    .list_all()
                    .iter()
                    .map(|p| p.to_string())
                    .collect();
                registered.lock().unwrap().push(names);
                Ok(())
            });
        }
        chat.registry()
            .subscribe(|_| Err(Error::Observer("stale window".to_string())));

        chat.registry().register("1", "dora", "d").unwrap();
        chat.registry().register("2", "eve", "e").unwrap();

        assert_eq!(
            *registered.lock().unwrap(),
            vec![vec!["dora".to_string()], vec!["dora".to_string(), "eve".to_string()]]
        );
        assert!(chat.registry().verify_credentials("2", &digest("e")).is_ok());
    }

    #[test]
    fn test_observer_auto_reply_is_delivered_in_order() {
        let chat = chat_with(&[("1", "alice", "a"), ("2", "bob", "b")]);
        let alice = chat.login("alice", "a").unwrap();
        let bob = chat.login("bob", "b").unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let store = Arc::clone(chat.store());
            let gateway = chat.gateway().clone();
            let (alice, bob) = (Arc::clone(&alice), Arc::clone(&bob));
            let seen = Arc::clone(&seen);
            chat.store().subscribe(move |event| {
                let StoreEvent::Appended { index } = *event;
                let message = store.get(index).unwrap();
                seen.lock().unwrap().push(index);
                if message.receiver() == "bob" {
                    gateway.send(&bob, &alice, "away from keyboard")?;
                }
                Ok(())
            });
        }

        let question = chat.gateway().send(&alice, &bob, "still there?").unwrap();

        let all = chat.store().all_messages();
        assert_eq!(all.len(), 2);
        assert!(Arc::ptr_eq(&all[0], &question));
        assert_eq!(all[1].sender(), "bob");
        assert_eq!(chat.gateway().render(&all[1], &alice), "away from keyboard");
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_public_keys_can_be_exported() {
        let chat = chat_with(&[("1", "alice", "a")]);
        let alice = chat.login("alice", "a").unwrap();

        let exported = alice.public_key().to_base64_der().unwrap();
        let imported = parley::ParticipantPublicKey::from_base64_der(&exported).unwrap();

        assert_eq!(&imported, alice.public_key());
        assert_eq!(imported.bits(), 2048);
    }
}
