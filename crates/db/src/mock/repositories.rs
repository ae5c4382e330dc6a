use bazaar_core::models::time_slot::ValidSlot;
use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbAccount, DbAd, DbChatMessage, DbConflictingAd, DbExecutionLog, DbSchedule, DbTimeSlot,
};

// Mock repositories for testing
mock! {
    pub AccountRepo {
        pub async fn get_account_by_id(&self, id: Uuid) -> eyre::Result<Option<DbAccount>>;

        pub async fn find_account_by_token(&self, api_token: String) -> eyre::Result<Option<DbAccount>>;
    }
}

mock! {
    pub AdRepo {
        pub async fn create_ad(
            &self,
            vendor_id: Uuid,
            title: String,
            description: String,
            kind: String,
        ) -> eyre::Result<DbAd>;

        pub async fn get_ad_by_id(&self, id: Uuid) -> eyre::Result<Option<DbAd>>;

        pub async fn list_ads(
            &self,
            vendor_id: Option<Uuid>,
            status: Option<String>,
        ) -> eyre::Result<Vec<DbAd>>;

        pub async fn update_ad_status(&self, id: Uuid, status: String) -> eyre::Result<Option<DbAd>>;
    }
}

mock! {
    pub TimeSlotRepo {
        pub async fn get_time_slots_by_ad_id(&self, ad_id: Uuid) -> eyre::Result<Vec<DbTimeSlot>>;

        pub async fn get_time_slot_by_id(&self, id: Uuid) -> eyre::Result<Option<DbTimeSlot>>;

        pub async fn replace_time_slots(
            &self,
            ad_id: Uuid,
            slots: Vec<ValidSlot>,
        ) -> eyre::Result<Vec<DbTimeSlot>>;
    }
}

mock! {
    pub ScheduleRepo {
        pub async fn find_conflicting_ads(
            &self,
            run_date: NaiveDate,
            weekday: i16,
            start: NaiveTime,
            end: NaiveTime,
            exclude_schedule: Option<Uuid>,
        ) -> eyre::Result<Vec<DbConflictingAd>>;

        pub async fn insert_schedule(
            &self,
            ad_id: Uuid,
            time_slot_id: Uuid,
            run_date: NaiveDate,
        ) -> eyre::Result<DbSchedule>;

        pub async fn get_schedule_by_id(&self, id: Uuid) -> eyre::Result<Option<DbSchedule>>;

        pub async fn cancel_schedule(&self, id: Uuid) -> eyre::Result<Option<DbSchedule>>;

        pub async fn reschedule(
            &self,
            id: Uuid,
            run_date: NaiveDate,
            time_slot_id: Option<Uuid>,
        ) -> eyre::Result<Option<DbSchedule>>;

        pub async fn reset_for_retry(&self, id: Uuid) -> eyre::Result<Option<DbSchedule>>;

        pub async fn transition_for_ad(
            &self,
            ad_id: Uuid,
            from: String,
            to: String,
        ) -> eyre::Result<Vec<DbSchedule>>;
    }
}

mock! {
    pub ExecutionLogRepo {
        pub async fn append(
            &self,
            schedule_id: Uuid,
            action: String,
            status: String,
            message: Option<String>,
            detail: Option<serde_json::Value>,
        ) -> eyre::Result<DbExecutionLog>;

        pub async fn get_logs_by_schedule_id(
            &self,
            schedule_id: Uuid,
        ) -> eyre::Result<Vec<DbExecutionLog>>;
    }
}

mock! {
    pub ChatRepo {
        pub async fn create_message(
            &self,
            sender_id: Uuid,
            recipient_id: Uuid,
            body: String,
        ) -> eyre::Result<DbChatMessage>;

        pub async fn get_message_by_id(&self, id: Uuid) -> eyre::Result<Option<DbChatMessage>>;

        pub async fn update_message_status(
            &self,
            id: Uuid,
            status: String,
        ) -> eyre::Result<Option<DbChatMessage>>;

        pub async fn get_messages_for_account(
            &self,
            account_id: Uuid,
        ) -> eyre::Result<Vec<DbChatMessage>>;
    }
}
