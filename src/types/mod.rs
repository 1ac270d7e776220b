pub use self::{
    push::{
        Claims, PushHeader, PushPayload, SubscriptionDescriptor,
        SubscriptionKeys, Urgency,
    },
    requests::{EndpointBody, NewHealthRecord, NewPet},
};

mod push;
mod requests;
