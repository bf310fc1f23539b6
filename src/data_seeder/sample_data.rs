use super::{SeedArticle, SeedComment, SeedData, SeedTopic, SeedUser};

const PUG_IMG: &str = "https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700";
const CAT_IMG: &str = "https://images.pexels.com/photos/97050/pexels-photo-97050.jpeg?w=700&h=700";

const SHADOW: &str = "Living in the shadow of a great man";
const PUGS: &str = "Eight pug gifs that remind me of mitch";
const CATSPIRACY: &str = "UNCOVERED: catspiracy to bring down democracy";
const TIN: &str = "A";
const DOGS: &str = "They're not exactly dogs, are they?";

pub(super) fn sample() -> SeedData {
    SeedData {
        topics: vec![
            SeedTopic {
                slug: "mitch",
                description: "The man, the Mitch, the legend",
                img_url: None,
            },
            SeedTopic {
                slug: "cats",
                description: "Not dogs",
                img_url: None,
            },
            SeedTopic {
                slug: "paper",
                description: "what books are made of",
                img_url: None,
            },
        ],
        users: vec![
            SeedUser {
                username: "butter_bridge",
                name: "jonny",
                avatar_url: Some("https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg"),
            },
            SeedUser {
                username: "icellusedkars",
                name: "sam",
                avatar_url: Some("https://avatars2.githubusercontent.com/u/24604688?s=460&v=4"),
            },
            SeedUser {
                username: "rogersop",
                name: "paul",
                avatar_url: Some("https://avatars2.githubusercontent.com/u/24394918?s=400&v=4"),
            },
            SeedUser {
                username: "lurker",
                name: "do_nothing",
                avatar_url: None,
            },
        ],
        articles: vec![
            article(SHADOW, "mitch", "butter_bridge", "I find this existence challenging", 1594329060000, 100),
            article("Sony Vaio; or, The Laptop", "mitch", "icellusedkars", "Call me Mitchell. Some years ago I bought a laptop.", 1602828180000, 0),
            article(PUGS, "mitch", "icellusedkars", "some gifs", 1604394720000, 5),
            article("Student SUES Mitch!", "mitch", "rogersop", "We all love Mitch and his wonderful, unique typing style.", 1588731240000, 0),
            article(CATSPIRACY, "cats", "rogersop", "Bastet walks amongst us, and the cats are taking arms!", 1596464040000, 12),
            article(TIN, "mitch", "icellusedkars", "Delicious tin of cat food", 1602986400000, 1),
            article("Z", "mitch", "icellusedkars", "I was hungry.", 1578406080000, 0),
            article("Does Mitch predate civilisation?", "mitch", "icellusedkars", "Archaeologists have uncovered a gigantic statue from the dawn of humanity.", 1587089280000, 7),
            article(DOGS, "mitch", "butter_bridge", "Well? Think about it.", 1591438200000, 3),
            article("Seven inspirational thought leaders from Manchester UK", "mitch", "rogersop", "Who are we kidding, there is only one, and it's Mitch!", 1589433300000, 0),
            article("Am I a cat?", "mitch", "icellusedkars", "Having run out of ideas for articles, I am staring at the wall blankly.", 1579126860000, 0),
            article("Moustache", "mitch", "butter_bridge", "Have you seen the size of that thing?", 1602419040000, -2),
            article("Another article about Mitch", "mitch", "butter_bridge", "There will never be enough articles about Mitch!", 1602419040000, 0),
        ],
        comments: vec![
            comment(DOGS, "Oh, I've got compassion running out of my nose, pal! I'm the Sultan of Sentiment!", 16, "butter_bridge", 1586179020000),
            comment(SHADOW, "The beautiful thing about treasure is that it exists. Got to find out what kind of sheets these are; not cotton, not rayon, silky.", 14, "butter_bridge", 1604113380000),
            comment(SHADOW, "Replacing the quiet elegance of the dark suit and tie with the casual indifference of these muted earth tones is a form of fashion suicide, but, uh, call me crazy, on you it works.", 100, "icellusedkars", 1583025180000),
            comment(SHADOW, "I carry a log, yes. Is it funny to you? It is not to me.", -100, "icellusedkars", 1582459260000),
            comment(SHADOW, "I hate streaming noses", 0, "icellusedkars", 1604437200000),
            comment(SHADOW, "I hate streaming eyes even more", 0, "icellusedkars", 1604437200000),
            comment(SHADOW, "Lobster pot", 0, "icellusedkars", 1589577540000),
            comment(SHADOW, "Delicious crackerbreads", 0, "icellusedkars", 1586642520000),
            comment(SHADOW, "Superficially charming", 0, "icellusedkars", 1577848080000),
            comment(PUGS, "Massive intercranial brain haemorrhage", 0, "icellusedkars", 1583133000000),
            comment(CATSPIRACY, "What do you see? I have no idea where this will lead us. This place I speak of, is known as the Black Lodge.", 16, "icellusedkars", 1591438200000),
            comment(SHADOW, "Fruit pastilles", 0, "icellusedkars", 1592220300000),
            comment(SHADOW, "Ambidextrous marsupial", 0, "icellusedkars", 1600560600000),
            comment(PUGS, "git push origin master", 0, "icellusedkars", 1592641440000),
            comment(SHADOW, "This morning, I showered for nine minutes.", 16, "butter_bridge", 1595294400000),
            comment(CATSPIRACY, "Lorem ipsum dolor sit amet, consectetur adipiscing elit.", 1, "butter_bridge", 1600560600000),
            comment(TIN, "Knock knock. Who's there? Cat food.", 4, "rogersop", 1603000000000),
            comment(DOGS, "The owls are not what they seem.", 20, "icellusedkars", 1584205320000),
        ],
    }
}

fn article(
    title: &'static str,
    topic: &'static str,
    author: &'static str,
    body: &'static str,
    created_at: i64,
    votes: i64,
) -> SeedArticle {
    let article_img_url = if topic == "cats" { CAT_IMG } else { PUG_IMG };
    SeedArticle {
        title,
        topic,
        author,
        body,
        created_at,
        votes,
        article_img_url,
    }
}

fn comment(
    article_title: &'static str,
    body: &'static str,
    votes: i64,
    author: &'static str,
    created_at: i64,
) -> SeedComment {
    SeedComment {
        article_title,
        body,
        votes,
        author,
        created_at,
    }
}
