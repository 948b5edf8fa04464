// SPDX-License-Identifier: Apache-2.0

use gigboard_query::{ArtistRow, GigRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagDto {
    pub id: i64,
    pub tag_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GigSummaryDto {
    pub id: i64,
    pub user_id: i64,
    pub post_title: String,
    pub description: String,
    pub creation_date: i64,
    pub unpaid: bool,
    pub pay: Option<i64>,
    pub ishourly: bool,
    pub zipcode: String,
}

impl From<GigRow> for GigSummaryDto {
    fn from(row: GigRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            post_title: row.post_title,
            description: row.description,
            creation_date: row.creation_date,
            unpaid: row.unpaid,
            pay: row.pay,
            ishourly: row.ishourly,
            zipcode: row.zipcode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtistSummaryDto {
    pub id: i64,
    pub user_name: String,
    pub bio: Option<String>,
    pub last_active: i64,
    pub hourly_rate: Option<i64>,
    pub daysweek: String,
}

impl From<ArtistRow> for ArtistSummaryDto {
    fn from(row: ArtistRow) -> Self {
        Self {
            id: row.id,
            user_name: row.user_name,
            bio: row.bio,
            last_active: row.last_active,
            hourly_rate: row.hourly_rate,
            daysweek: row.daysweek,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GigListDto {
    pub count: usize,
    pub gigs: Vec<GigSummaryDto>,
}

impl GigListDto {
    #[must_use]
    pub fn from_rows(rows: Vec<GigRow>) -> Self {
        let gigs: Vec<GigSummaryDto> = rows.into_iter().map(Into::into).collect();
        Self {
            count: gigs.len(),
            gigs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtistListDto {
    pub count: usize,
    pub artists: Vec<ArtistSummaryDto>,
}

impl ArtistListDto {
    #[must_use]
    pub fn from_rows(rows: Vec<ArtistRow>) -> Self {
        let artists: Vec<ArtistSummaryDto> = rows.into_iter().map(Into::into).collect();
        Self {
            count: artists.len(),
            artists,
        }
    }
}

/// Public contact card for a gig's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnerDto {
    pub id: i64,
    pub user_name: String,
    pub display_email: String,
    pub phone: Option<String>,
    pub link_to_website: Option<String>,
}

/// Gig detail view: the row, its owner, its tags, and the map selection.
/// The map is carried as pre-serialized json; its shape belongs to the geo
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GigDetailDto {
    pub gig: GigSummaryDto,
    pub owner: OwnerDto,
    pub tags: Vec<TagDto>,
    pub map: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDto {
    pub id: i64,
    pub user_name: String,
    pub display_email: String,
    pub is_artist: bool,
    pub verified: bool,
    pub show_unpaid: bool,
    pub last_active: i64,
    pub hourly_rate: Option<i64>,
    pub link_to_website: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub daysweek: String,
    pub tags: Vec<TagDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionDto {
    pub token: String,
    pub user_id: i64,
}
