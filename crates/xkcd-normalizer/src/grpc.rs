use tonic::{Request, Response, Status};
use xkcd_proto::common::Empty;
use xkcd_proto::words::words_server::Words;
use xkcd_proto::words::{WordsReply, WordsRequest};

use crate::{normalize, Error};

#[derive(Debug, Default)]
pub struct WordsService;

#[tonic::async_trait]
impl Words for WordsService {
    async fn ping(&self, _req: Request<Empty>) -> Result<Response<Empty>, Status> {
        Ok(Response::new(Empty {}))
    }

    async fn norm(&self, req: Request<WordsRequest>) -> Result<Response<WordsReply>, Status> {
        let phrase = req.into_inner().phrase;
        let words = normalize(&phrase).map_err(|err| match err {
            Error::ResourceExhausted => Status::resource_exhausted(err.to_string()),
        })?;
        Ok(Response::new(WordsReply {
            words: words.into_iter().collect(),
        }))
    }
}
