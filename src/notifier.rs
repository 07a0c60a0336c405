//! Rendering bans as Discord embeds and delivering them to a webhook

use crate::ban::BanRecord;
use crate::config::RelayConfig;
use crate::duration::format_duration;
use crate::error::{RelayError, RelayResult};
use crate::NOTIFY_TARGET;
use serenity::all::{CreateEmbed, CreateEmbedFooter, ExecuteWebhook, Http, Webhook};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Embed colour for ban notifications (red)
pub const ALERT_COLOUR: u32 = 0xFF_00_00;
/// Size in pixels requested for avatar thumbnails
pub const AVATAR_SIZE: u32 = 64;

/// A labelled embed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl PayloadField {
    fn new(name: &str, value: String, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline,
        }
    }
}

/// Presentation of a single ban
///
/// Kept separate from `CreateEmbed` so the rendering can be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub color: u32,
    pub thumbnail_url: String,
    pub fields: Vec<PayloadField>,
    pub footer: String,
}

impl NotificationPayload {
    /// Render `record`, taking avatars from `avatar_base_url`
    #[must_use]
    pub fn from_ban(record: &BanRecord, avatar_base_url: &str) -> Self {
        let avatar_base_url = avatar_base_url.trim_end_matches('/');
        Self {
            title: record.subject_name.clone(),
            color: ALERT_COLOUR,
            thumbnail_url: format!("{avatar_base_url}/{}/{AVATAR_SIZE}", record.subject_id),
            fields: vec![
                PayloadField::new("Punishment", code(&record.punishment_type), true),
                PayloadField::new("Reason", code(&record.reason), true),
                PayloadField::new(
                    "Duration",
                    code(&format_duration(record.whole_duration_secs())),
                    false,
                ),
                PayloadField::new("Banned", relative_time(record.banned_at_secs()), true),
                PayloadField::new("Unbanned", relative_time(record.unbanned_at()), true),
            ],
            footer: record.subject_id.to_string(),
        }
    }

    /// Value of the field called `name`
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

impl From<NotificationPayload> for CreateEmbed {
    fn from(payload: NotificationPayload) -> Self {
        payload.fields.into_iter().fold(
            CreateEmbed::new()
                .title(payload.title)
                .colour(payload.color)
                .thumbnail(payload.thumbnail_url)
                .footer(CreateEmbedFooter::new(payload.footer)),
            |embed, field| embed.field(field.name, field.value, field.inline),
        )
    }
}

fn code(text: &str) -> String {
    format!("`{text}`")
}

/// Discord relative timestamp markup
fn relative_time(epoch_seconds: i64) -> String {
    format!("<t:{epoch_seconds}:R>")
}

/// Destination for ban notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification for `record`
    async fn notify(&self, record: &BanRecord) -> RelayResult<()>;
}

/// `Notifier` posting embeds to a Discord webhook
pub struct WebhookNotifier {
    http: Arc<Http>,
    url: String,
    avatar_base_url: String,
    webhook: OnceCell<Webhook>,
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL embeds the webhook token.
        f.debug_struct("WebhookNotifier")
            .field("avatar_base_url", &self.avatar_base_url)
            .field("resolved", &self.webhook.initialized())
            .finish_non_exhaustive()
    }
}

impl WebhookNotifier {
    #[must_use]
    pub fn new(http: Arc<Http>, url: impl Into<String>, avatar_base_url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            avatar_base_url: avatar_base_url.into(),
            webhook: OnceCell::new(),
        }
    }

    /// Notifier for the configured webhook, using an unauthenticated client
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(
            Arc::new(Http::new("")),
            config.webhook_url.clone(),
            config.avatar_base_url.clone(),
        )
    }

    /// Look the webhook up on first use; failures are retried on the next call
    async fn webhook(&self) -> RelayResult<&Webhook> {
        self.webhook
            .get_or_try_init(|| async {
                let webhook = Webhook::from_url(&self.http, &self.url).await?;
                info!(
                    target: NOTIFY_TARGET,
                    webhook_id = %webhook.id,
                    "Resolved notification webhook"
                );
                Ok::<_, RelayError>(webhook)
            })
            .await
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, record: &BanRecord) -> RelayResult<()> {
        let webhook = self.webhook().await?;
        let payload = NotificationPayload::from_ban(record, &self.avatar_base_url);
        let builder = ExecuteWebhook::new().embed(payload.into());

        webhook.execute(&*self.http, false, builder).await?;

        debug!(
            target: NOTIFY_TARGET,
            subject_id = %record.subject_id,
            "Webhook executed"
        );
        Ok(())
    }
}
