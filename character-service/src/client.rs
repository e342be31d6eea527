use anyhow::{Context, Result, anyhow};
use reqwest::{Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::{
    character::{Character, CharacterId, Message, StatUpdate},
    cli::ClientArgs,
    store::CharacterMap,
};

/// Typed HTTP client for the character API. Any non-2xx status is an error
/// carrying the server's message; nothing is retried.
#[derive(Debug, Clone)]
pub struct CharacterClient {
    http: reqwest::Client,
    base: Url,
}

impl CharacterClient {
    /// `base` is the server root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub async fn create(&self, character: &Character) -> Result<Character> {
        let response = self
            .http
            .post(self.url("characters")?)
            .json(character)
            .send()
            .await
            .context("POST /characters")?;
        decode(response).await
    }

    pub async fn list(&self) -> Result<CharacterMap> {
        let response = self
            .http
            .get(self.url("characters")?)
            .send()
            .await
            .context("GET /characters")?;
        decode(response).await
    }

    /// Queries the filter route. `level` and `charisma` are always sent, since
    /// the server treats absent numbers as 0 anyway.
    pub async fn find(&self, role: &str, level: i64, charisma: i64) -> Result<CharacterMap> {
        let mut url = self.url("characters/")?;
        url.query_pairs_mut()
            .append_pair("role", role)
            .append_pair("level", &level.to_string())
            .append_pair("charisma", &charisma.to_string());

        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("GET /characters/?")?;
        decode(response).await
    }

    pub async fn update(&self, id: CharacterId, update: &StatUpdate) -> Result<Character> {
        let response = self
            .http
            .put(self.url(&format!("characters/{id}"))?)
            .json(update)
            .send()
            .await
            .with_context(|| format!("PUT /characters/{id}"))?;
        decode(response).await
    }

    pub async fn delete(&self, id: CharacterId) -> Result<Message> {
        let response = self
            .http
            .delete(self.url(&format!("characters/{id}"))?)
            .send()
            .await
            .with_context(|| format!("DELETE /characters/{id}"))?;
        decode(response).await
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("invalid path '{path}' for base {}", self.base))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let url = response.url().clone();
    if !status.is_success() {
        let detail = match response.json::<Message>().await {
            Ok(Message { message }) => message,
            Err(_) => "no message".to_string(),
        };
        return Err(anyhow!("{url} returned {status}: {detail}"));
    }
    response
        .json()
        .await
        .with_context(|| format!("invalid JSON from {url}"))
}

/// Runs the demonstration scenario against a live server, printing one line per step.
pub async fn run(args: ClientArgs) -> Result<()> {
    let client = CharacterClient::new(args.server.clone());
    info!("talking to {}", args.server);

    let gandalf = client
        .create(&Character::new("Gandalf", 10, "Wizard", 15, 10, 10))
        .await?;
    print_step("POST /characters", &gandalf)?;

    let legolas = client
        .create(&Character::new("Legolas", 5, "Archer", 15, 10, 10))
        .await?;
    print_step("POST /characters", &legolas)?;

    let all = client.list().await?;
    print_step("GET /characters", &all)?;

    let archers = client.find("Archer", 5, 15).await?;
    print_step("GET /characters/?role=Archer&level=5&charisma=15", &archers)?;

    let gandalf_id = id_of(&all, &gandalf)?;
    let updated = client
        .update(
            gandalf_id,
            &StatUpdate {
                charisma: Some(20.into()),
                ..StatUpdate::default()
            },
        )
        .await?;
    print_step(&format!("PUT /characters/{gandalf_id}"), &updated)?;

    let deleted = client.delete(gandalf_id).await?;
    print_step(&format!("DELETE /characters/{gandalf_id}"), &deleted)?;

    let remaining = client.list().await?;
    print_step("GET /characters", &remaining)?;

    Ok(())
}

/// Finds the identifier the server assigned to `character`. The create
/// response carries no identifier, so the most recent matching entry wins.
fn id_of(listing: &CharacterMap, character: &Character) -> Result<CharacterId> {
    listing
        .iter()
        .rev()
        .find(|(_, stored)| *stored == character)
        .map(|(id, _)| *id)
        .ok_or_else(|| anyhow!("{} missing from listing", character.name))
}

fn print_step<T: Serialize>(label: &str, body: &T) -> Result<()> {
    let rendered = serde_json::to_string(body)?;
    println!("{label} -> {rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_of_prefers_latest_duplicate() {
        let gandalf = Character::new("Gandalf", 10, "Wizard", 15, 10, 10);
        let listing = CharacterMap::from([
            (1, gandalf.clone()),
            (2, Character::new("Legolas", 5, "Archer", 15, 10, 10)),
            (3, gandalf.clone()),
        ]);
        assert_eq!(id_of(&listing, &gandalf).expect("present"), 3);
    }

    #[test]
    fn urls_are_joined_under_the_base() {
        let client = CharacterClient::new("http://127.0.0.1:8000".parse().expect("url"));
        assert_eq!(
            client.url("characters/7").expect("join").as_str(),
            "http://127.0.0.1:8000/characters/7"
        );
        assert_eq!(
            client.url("characters/").expect("join").as_str(),
            "http://127.0.0.1:8000/characters/"
        );
    }
}
