//! Message store: buyer/seller conversations with unread accounting.
//!
//! Conversations and messages live under separate keys. A conversation is
//! identified by the (product, buyer, seller) triple; its summary row
//! carries denormalized product and participant display fields plus the
//! last-message preview the inbox list renders.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vintly_core::{ConversationId, EntityId, MessageId, UserId};

use crate::storage::{StorageEngine, generate_id, keys};
use crate::sync::{ChangeBus, StoreEvent};

use super::{read_collection, write_collection};

/// One side of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
}

/// Everything needed to open a conversation about a product.
#[derive(Debug, Clone)]
pub struct ConversationSeed {
    pub product_id: EntityId,
    pub product_title: String,
    pub product_image: String,
    pub product_price: Decimal,
    pub seller: Participant,
    pub buyer: Participant,
}

/// A conversation summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub product_id: EntityId,
    pub product_title: String,
    pub product_image: String,
    pub product_price: Decimal,
    pub seller_id: UserId,
    pub seller_name: String,
    pub seller_avatar: String,
    pub buyer_id: UserId,
    pub buyer_name: String,
    pub buyer_avatar: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub unread_count: u32,
    pub created_at: DateTime<Utc>,
}

/// A single message within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_avatar: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Repository for conversations and their messages.
#[derive(Clone)]
pub struct MessageStore {
    engine: Arc<dyn StorageEngine>,
    bus: ChangeBus,
}

impl MessageStore {
    /// Create a message store over the given engine and bus.
    #[must_use]
    pub fn new(engine: Arc<dyn StorageEngine>, bus: ChangeBus) -> Self {
        Self { engine, bus }
    }

    fn all_conversations(&self) -> Vec<Conversation> {
        read_collection(self.engine.as_ref(), keys::CONVERSATIONS)
    }

    fn all_messages(&self) -> Vec<Message> {
        read_collection(self.engine.as_ref(), keys::MESSAGES)
    }

    /// Conversations where `user` participates as buyer or seller, most
    /// recent activity first.
    #[must_use]
    pub fn conversations_for(&self, user: &UserId) -> Vec<Conversation> {
        let mut conversations: Vec<_> = self
            .all_conversations()
            .into_iter()
            .filter(|c| &c.seller_id == user || &c.buyer_id == user)
            .collect();
        conversations.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        conversations
    }

    /// Conversations where `seller` is the selling side, most recent
    /// activity first.
    #[must_use]
    pub fn seller_conversations(&self, seller: &UserId) -> Vec<Conversation> {
        let mut conversations: Vec<_> = self
            .all_conversations()
            .into_iter()
            .filter(|c| &c.seller_id == seller)
            .collect();
        conversations.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        conversations
    }

    /// Look up a conversation by id.
    #[must_use]
    pub fn conversation(&self, id: &ConversationId) -> Option<Conversation> {
        self.all_conversations().into_iter().find(|c| &c.id == id)
    }

    /// Messages of a conversation, oldest first.
    #[must_use]
    pub fn messages(&self, conversation: &ConversationId) -> Vec<Message> {
        let mut messages: Vec<_> = self
            .all_messages()
            .into_iter()
            .filter(|m| &m.conversation_id == conversation)
            .collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        messages
    }

    /// Find the conversation for (product, buyer, seller), creating it if
    /// none exists yet.
    pub fn get_or_create_conversation(&self, seed: ConversationSeed) -> Conversation {
        let mut conversations = self.all_conversations();

        if let Some(existing) = conversations.iter().find(|c| {
            c.product_id == seed.product_id
                && c.buyer_id == seed.buyer.id
                && c.seller_id == seed.seller.id
        }) {
            return existing.clone();
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: ConversationId::new(generate_id("conv")),
            product_id: seed.product_id,
            product_title: seed.product_title,
            product_image: seed.product_image,
            product_price: seed.product_price,
            seller_id: seed.seller.id,
            seller_name: seed.seller.name,
            seller_avatar: seed.seller.avatar,
            buyer_id: seed.buyer.id,
            buyer_name: seed.buyer.name,
            buyer_avatar: seed.buyer.avatar,
            last_message: String::new(),
            last_message_time: now,
            unread_count: 0,
            created_at: now,
        };

        conversations.push(conversation.clone());
        write_collection(self.engine.as_ref(), keys::CONVERSATIONS, &conversations);

        conversation
    }

    /// Append a message and update the conversation summary.
    ///
    /// Messages from the buyer increment the seller's unread count; the
    /// seller's own replies do not.
    pub fn send(
        &self,
        conversation_id: &ConversationId,
        sender: &Participant,
        content: &str,
    ) -> Message {
        let message = Message {
            id: MessageId::new(generate_id("msg")),
            conversation_id: conversation_id.clone(),
            sender_id: sender.id.clone(),
            sender_name: sender.name.clone(),
            sender_avatar: sender.avatar.clone(),
            content: content.to_owned(),
            timestamp: Utc::now(),
            read: false,
        };

        let mut messages = self.all_messages();
        messages.push(message.clone());
        write_collection(self.engine.as_ref(), keys::MESSAGES, &messages);

        let mut conversations = self.all_conversations();
        if let Some(conversation) = conversations.iter_mut().find(|c| &c.id == conversation_id) {
            conversation.last_message = message.content.clone();
            conversation.last_message_time = message.timestamp;
            if conversation.seller_id != sender.id {
                conversation.unread_count += 1;
            }
            write_collection(self.engine.as_ref(), keys::CONVERSATIONS, &conversations);
        }

        self.bus.publish(StoreEvent::MessagesUpdated {
            conversation_id: conversation_id.clone(),
        });

        message
    }

    /// Mark the other party's messages in a conversation as read.
    ///
    /// The unread counter tracks the seller's inbox, so it only resets when
    /// the reader is the seller.
    pub fn mark_read(&self, conversation_id: &ConversationId, reader: &UserId) {
        let mut messages = self.all_messages();
        for message in &mut messages {
            if &message.conversation_id == conversation_id && &message.sender_id != reader {
                message.read = true;
            }
        }
        write_collection(self.engine.as_ref(), keys::MESSAGES, &messages);

        let mut conversations = self.all_conversations();
        if let Some(conversation) = conversations.iter_mut().find(|c| &c.id == conversation_id) {
            if &conversation.seller_id == reader {
                conversation.unread_count = 0;
            }
            write_collection(self.engine.as_ref(), keys::CONVERSATIONS, &conversations);
        }

        self.bus.publish(StoreEvent::MessagesUpdated {
            conversation_id: conversation_id.clone(),
        });
    }

    /// Total unread messages across a seller's conversations.
    #[must_use]
    pub fn unread_count(&self, seller: &UserId) -> u32 {
        self.seller_conversations(seller)
            .iter()
            .map(|c| c.unread_count)
            .sum()
    }

    /// Seed demo conversations for a seller's inbox.
    ///
    /// No-op when the seller already has conversations.
    pub fn seed_sample_conversations(&self, seller: &Participant) {
        let mut conversations = self.all_conversations();
        if conversations.iter().any(|c| c.seller_id == seller.id) {
            return;
        }

        let buyers = [
            (
                "buyer_1",
                "Sophie Chen",
                "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=100",
                "Is this still available?",
            ),
            (
                "buyer_2",
                "Emma Wilson",
                "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=100",
                "Can you share more photos?",
            ),
            (
                "buyer_3",
                "Olivia Martinez",
                "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=100",
                "What's the lowest you'll go?",
            ),
        ];
        let products = [
            (
                "demo_1",
                "Chanel Classic Flap",
                "https://images.unsplash.com/photo-1584917865442-de89df76afd3?w=300",
                4500,
            ),
            (
                "demo_2",
                "Hermès Birkin 30",
                "https://images.unsplash.com/photo-1548036328-c9fa89d128fa?w=300",
                12_000,
            ),
        ];

        let now = Utc::now();
        let mut messages = self.all_messages();

        for (i, (buyer_id, buyer_name, buyer_avatar, opener)) in buyers.iter().enumerate() {
            let (product_id, product_title, product_image, product_price) =
                products[i % products.len()];
            let last_message_time = now - Duration::hours(i as i64);

            let conversation = Conversation {
                id: ConversationId::new(format!("conv_sample_{i}")),
                product_id: EntityId::new(product_id),
                product_title: product_title.to_owned(),
                product_image: product_image.to_owned(),
                product_price: Decimal::from(product_price),
                seller_id: seller.id.clone(),
                seller_name: seller.name.clone(),
                seller_avatar: seller.avatar.clone(),
                buyer_id: UserId::new(*buyer_id),
                buyer_name: (*buyer_name).to_owned(),
                buyer_avatar: (*buyer_avatar).to_owned(),
                last_message: (*opener).to_owned(),
                last_message_time,
                unread_count: u32::from(i == 0),
                created_at: now - Duration::days(i as i64 + 1),
            };

            messages.push(Message {
                id: MessageId::new(format!("msg_sample_{i}_1")),
                conversation_id: conversation.id.clone(),
                sender_id: conversation.buyer_id.clone(),
                sender_name: conversation.buyer_name.clone(),
                sender_avatar: conversation.buyer_avatar.clone(),
                content: conversation.last_message.clone(),
                timestamp: conversation.last_message_time,
                read: i != 0,
            });
            conversations.push(conversation);
        }

        write_collection(self.engine.as_ref(), keys::CONVERSATIONS, &conversations);
        write_collection(self.engine.as_ref(), keys::MESSAGES, &messages);
    }
}
