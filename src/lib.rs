//! Typed client for the nebulon ON GraphQL API.
//!
//! This crate provides:
//! - A typed query and mutation layer that renders GraphQL documents from
//!   operation names, arguments, and selections.
//! - Input, filter, and sort objects with client-side validation.
//! - Paginated list results with server-count consistency checks.
//! - Resource methods for volumes, snapshots, nPods, nPod groups, SPUs,
//!   hosts, datacenters, and users.
//!
//! ```no_run
//! use nebclient::{NebClient, PageInput, StringFilter, VolumeFilter};
//!
//! # async fn run() -> Result<(), nebclient::NebClientError> {
//! let client = NebClient::builder()
//!     .with_session_token("eyJhbGciOi...")
//!     .build()?;
//!
//! let volumes = client
//!     .get_volumes(
//!         Some(PageInput::default()),
//!         Some(VolumeFilter::default().with_name(StringFilter::default().begins_with("db-"))),
//!         None,
//!     )
//!     .await?;
//! for volume in &volumes.items {
//!     println!("{} ({} bytes)", volume.name, volume.size_bytes);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]

mod client;
mod datacenters;
mod error;
mod filters;
mod hosts;
mod maybe;
mod npod_groups;
mod npods;
mod operation;
mod page;
mod refs;
mod snapshots;
mod sorting;
mod spus;
mod users;
mod volumes;

pub use client::{NebClient, NebClientBuilder, DEFAULT_ENDPOINT};
pub use datacenters::{
    Address, CommunicationMethodType, Contact, CreateDataCenterInput, DataCenter,
    DataCenterFilter, DataCenterSort, DeleteDataCenterInput, UpdateDataCenterInput,
};
pub use error::{
    GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, HttpErrorInfo, NebClientError,
};
pub use filters::{IntFilter, StringFilter, UuidFilter};
pub use hosts::{Dimm, Host, HostFilter, HostSort, UpdateHostInput};
pub use maybe::Maybe;
pub use npod_groups::{
    CreateNPodGroupInput, NPodGroup, NPodGroupFilter, NPodGroupSort, UpdateNPodGroupInput,
};
pub use npods::{
    CreateNPodInput, DeleteNPodInput, NPod, NPodFilter, NPodSort, NPodSpuInput,
    SetNPodTimeZoneInput, UpdateHistory,
};
pub use page::{ItemList, PageInput};
pub use refs::{SerialRef, UuidRef, WwnRef};
pub use snapshots::{
    CreateCloneInput, CreateSnapshotInput, CreateSnapshotScheduleTemplateInput,
    DeleteSnapshotScheduleTemplateInput, Schedule, ScheduleInput, SnapshotConsistencyLevel,
    SnapshotScheduleTemplate, SnapshotScheduleTemplateFilter, SnapshotScheduleTemplateSort,
    UpdateSnapshotScheduleTemplateInput,
};
pub use sorting::SortDirection;
pub use spus::{
    IpInfoState, NtpServer, NtpServerInput, SecureEraseSpuInput, SetNtpServersInput, Spu,
    SpuFilter, SpuSort,
};
pub use users::{
    CreateUserInput, SendNotificationType, UpdateUserInput, User, UserFilter, UserPreferences,
    UserSort,
};
pub use volumes::{
    CreateVolumeInput, UpdateVolumeInput, Volume, VolumeFilter, VolumeSort, VolumeSyncState,
};
