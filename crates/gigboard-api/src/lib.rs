// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! Wire layer between HTTP handlers and the search/store crates: query
//! parameter parsing with degrade-to-unfiltered semantics, the API error
//! envelope, and response DTOs.

mod dto;
mod errors;
mod params;

pub use dto::{
    ArtistListDto, ArtistSummaryDto, GigDetailDto, GigListDto, GigSummaryDto, OwnerDto,
    ProfileDto, SessionDto, TagDto,
};
pub use errors::{http_status, ApiError, ApiErrorCode};
pub use params::{parse_artist_search, parse_gig_search, parse_weekday};
