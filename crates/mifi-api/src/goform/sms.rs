// SMS inbox: count, list, send, delete

use tracing::debug;

use crate::error::Error;
use crate::goform::client::{GET_CMD_PATH, GoformClient, SET_CMD_PATH};
use crate::goform::decode::{Fields, check_result, decode_sms_content, parse_sms_timestamp};
use crate::goform::models::{SmsDirection, SmsMessage};

/// Device format for the `sms_time` field of an outgoing message.
const SMS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl GoformClient {
    /// Total messages stored on the device. Zero when the field is missing
    /// or unreadable.
    pub async fn sms_count(&self) -> Result<u32, Error> {
        let map = self
            .get(
                GET_CMD_PATH,
                &[("cmd", "sms_data_total"), ("multi_data", "1"), ("isTest", "false")],
            )
            .await?;

        Ok(Fields::new(&map).parse("sms_data_total"))
    }

    /// One page of stored messages, newest first. Pages count from 0.
    pub async fn list_sms(&self, page: u32, per_page: u32) -> Result<Vec<SmsMessage>, Error> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let map = self
            .get(
                GET_CMD_PATH,
                &[
                    ("cmd", "sms_data_total"),
                    ("page", &page),
                    ("data_per_page", &per_page),
                    ("mem_store", "1"),
                    ("tags", "10"),
                    ("order_by", "order by id desc"),
                ],
            )
            .await?;

        let messages: Vec<SmsMessage> = Fields::new(&map)
            .objects("messages")
            .into_iter()
            .map(decode_message)
            .collect();
        debug!(count = messages.len(), "fetched SMS page");
        Ok(messages)
    }

    /// Send a text message. The device encodes and queues it.
    pub async fn send_sms(&self, number: &str, text: &str) -> Result<(), Error> {
        debug!(number, "sending SMS");
        let sms_time = chrono::Local::now().format(SMS_TIME_FORMAT).to_string();

        let resp = self
            .post(
                SET_CMD_PATH,
                &[
                    ("goformId", "SEND_SMS"),
                    ("notCallback", "true"),
                    ("Number", number),
                    ("sms_time", &sms_time),
                    ("MessageBody", text),
                    ("ID", "-1"),
                    ("encode_type", "GSM7_default"),
                    ("isTest", "false"),
                ],
            )
            .await?;
        check_result(&resp, "send SMS")
    }

    /// Delete stored messages by id.
    pub async fn delete_sms(&self, ids: &[String]) -> Result<(), Error> {
        debug!(count = ids.len(), "deleting SMS");
        let msg_id = ids.join(";");

        let resp = self
            .post(
                SET_CMD_PATH,
                &[
                    ("goformId", "DELETE_SMS"),
                    ("msg_id", &msg_id),
                    ("notCallback", "true"),
                    ("isTest", "false"),
                ],
            )
            .await?;
        check_result(&resp, "delete SMS")
    }
}

fn decode_message(f: Fields<'_>) -> SmsMessage {
    let status = f.text("tag");
    SmsMessage {
        id: f.text("id"),
        number: f.text("number"),
        content: f
            .opt_text("content")
            .map(|raw| decode_sms_content(&raw))
            .unwrap_or_default(),
        timestamp: f.opt_text("date").and_then(|d| parse_sms_timestamp(&d)),
        direction: SmsDirection::from_tag(&status),
        status,
    }
}
