//! `flickr.photosets.*`

use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Declared, flickr_method};
use crate::validation::{at_least, non_empty, opt_in_range};

/// Which media types `getPhotos` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotosetMedia {
    #[default]
    All,
    Photos,
    Videos,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetPhotosRequest {
    pub photoset_id: String,
    /// Owner of the set.
    pub user_id: String,
    /// Comma separated extra fields, e.g. `date_taken,url_m`.
    pub extras: Option<String>,
    /// 1 to 500. The API defaults to 500.
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    /// 1 public, 2 friends, 3 family, 4 friends and family, 5 private.
    pub privacy_filter: Option<u8>,
    pub media: Option<PhotosetMedia>,
}

impl GetPhotosRequest {
    pub fn new(photoset_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            photoset_id: photoset_id.into(),
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AddPhotoRequest {
    pub photoset_id: String,
    pub photo_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatePhotosetRequest {
    pub title: String,
    /// Must belong to the calling user.
    pub primary_photo_id: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EditMetaRequest {
    pub photoset_id: String,
    pub title: String,
    pub description: String,
}

/// Replaces the photos of a set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditPhotosRequest {
    pub photoset_id: String,
    /// Must also appear in `photo_ids`.
    pub primary_photo_id: String,
    /// Comma separated, in display order.
    pub photo_ids: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetContextRequest {
    pub photo_id: String,
    pub photoset_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetInfoRequest {
    pub photoset_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetListRequest {
    /// Defaults to the calling user.
    pub user_id: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub primary_photo_extras: Option<String>,
    pub photo_ids: Option<String>,
    pub sort_groups: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderSetsRequest {
    /// Comma separated, in the desired order.
    pub photoset_ids: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovePhotoRequest {
    pub photoset_id: String,
    pub photo_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovePhotosRequest {
    pub photoset_id: String,
    pub photo_ids: String,
}

/// Photos missing from `photo_ids` keep their relative order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReorderPhotosRequest {
    pub photoset_id: String,
    pub photo_ids: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetPrimaryPhotoRequest {
    pub photoset_id: String,
    pub photo_id: String,
}

fn get_photos(req: GetPhotosRequest) -> Declared {
    non_empty("photoset_id", &req.photoset_id)?;
    opt_in_range("per_page", req.per_page, 1..=500)?;
    at_least("page", req.page, 1)?;
    opt_in_range("privacy_filter", req.privacy_filter, 1..=5)?;
    flickr_method(RestMethod::Get, "photosets.getPhotos", &req)
}

fn edit_photos(req: EditPhotosRequest) -> Declared {
    non_empty("photoset_id", &req.photoset_id)?;
    let listed = req
        .photo_ids
        .split(',')
        .any(|id| id.trim() == req.primary_photo_id);
    if !listed {
        return Err(ValidationError::invalid(
            "photo_ids",
            format!("must contain the primary photo {}", req.primary_photo_id),
        )
        .into());
    }
    flickr_method(RestMethod::Post, "photosets.editPhotos", &req)
}

fn get_list(req: GetListRequest) -> Declared {
    at_least("page", req.page, 1)?;
    opt_in_range("per_page", req.per_page, 1..=500)?;
    flickr_method(RestMethod::Get, "photosets.getList", &req)
}

/// Photoset management.
#[derive(Debug, Clone)]
pub struct Photosets {
    pub get_photos: Endpoint<GetPhotosRequest, Value>,
    pub add_photo: Endpoint<AddPhotoRequest, Value>,
    pub create: Endpoint<CreatePhotosetRequest, Value>,
    /// Takes the photoset id.
    pub delete: Endpoint<String, Value>,
    pub edit_meta: Endpoint<EditMetaRequest, Value>,
    pub edit_photos: Endpoint<EditPhotosRequest, Value>,
    pub get_context: Endpoint<GetContextRequest, Value>,
    pub get_info: Endpoint<GetInfoRequest, Value>,
    pub get_list: Endpoint<GetListRequest, Value>,
    pub order_sets: Endpoint<OrderSetsRequest, Value>,
    pub remove_photo: Endpoint<RemovePhotoRequest, Value>,
    pub remove_photos: Endpoint<RemovePhotosRequest, Value>,
    pub reorder_photos: Endpoint<ReorderPhotosRequest, Value>,
    pub set_primary_photo: Endpoint<SetPrimaryPhotoRequest, Value>,
}

impl Photosets {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        use RestMethod::{Get, Post};

        Self {
            get_photos: builder.build(get_photos),
            add_photo: builder.build(|req: AddPhotoRequest| {
                flickr_method(Get, "photosets.addPhoto", &req)
            }),
            create: builder.build(|req: CreatePhotosetRequest| {
                non_empty("title", &req.title)?;
                flickr_method(Get, "photosets.create", &req)
            }),
            delete: builder.build(|photoset_id: String| {
                #[derive(Serialize)]
                struct Params {
                    photoset_id: String,
                }
                flickr_method(Get, "photosets.delete", &Params { photoset_id })
            }),
            edit_meta: builder.build(|req: EditMetaRequest| {
                flickr_method(Post, "photosets.editMeta", &req)
            }),
            edit_photos: builder.build(edit_photos),
            get_context: builder.build(|req: GetContextRequest| {
                flickr_method(Get, "photosets.getContext", &req)
            }),
            get_info: builder.build(|req: GetInfoRequest| {
                flickr_method(Get, "photosets.getInfo", &req)
            }),
            get_list: builder.build(get_list),
            order_sets: builder.build(|req: OrderSetsRequest| {
                flickr_method(Post, "photosets.orderSets", &req)
            }),
            remove_photo: builder.build(|req: RemovePhotoRequest| {
                flickr_method(Post, "photosets.removePhoto", &req)
            }),
            remove_photos: builder.build(|req: RemovePhotosRequest| {
                flickr_method(Post, "photosets.removePhotos", &req)
            }),
            reorder_photos: builder.build(|req: ReorderPhotosRequest| {
                flickr_method(Post, "photosets.reorderPhotos", &req)
            }),
            set_primary_photo: builder.build(|req: SetPrimaryPhotoRequest| {
                flickr_method(Post, "photosets.setPrimaryPhoto", &req)
            }),
        }
    }
}
