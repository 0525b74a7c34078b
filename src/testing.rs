//! Fixture data directory shared by handler and session tests.

use crate::config::ChatbotConfig;
use crate::corpus::CorpusLibrary;
use crate::handlers::HandlerContext;
use crate::preferences::PreferenceStore;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const GAMES_CSV: &str = "\
name,description,genre,platform,short_description
Tetris,A tile-matching puzzle game about falling blocks.,Puzzle,\"PC, Xbox, PlayStation\",Stack the blocks
Portal 2,A first-person puzzle game built around a portal gun.,\"Puzzle, Adventure\",\"PC, Xbox, PlayStation\",Think with portals
Street Fighter,A head-to-head fighting game.,Action,\"PC, PlayStation\",Classic arcade brawler
Street Racer,Arcade racing on city streets.,Action,Xbox,Race through the city
Doom Eternal,A fast first-person shooter.,Action,\"PC, Xbox, PlayStation\",Rip and tear
Halo Infinite,A sci-fi shooter with an open world.,Action,\"PC, Xbox\",Master Chief returns
Hades,A rogue-like dungeon crawler from the underworld.,\"Action, Adventure\",\"PC, Xbox, PlayStation\",Escape the underworld
Celeste,A precise platformer about climbing a mountain.,Adventure,PC,Climb the mountain
Hollow Knight,An atmospheric action adventure in a ruined kingdom.,\"Action, Adventure\",\"PC, Xbox\",Explore Hallownest
Cuphead,A run and gun game drawn like 1930s cartoons.,Action,\"PC, Xbox, PlayStation\",Fight the bosses
Dead Cells,A rogue-lite metroidvania action game.,Action,\"PC, PlayStation\",Die and retry
Monument Valley,An illusory architecture puzzle game.,Puzzle,PC,Impossible geometry
";

pub const INTENT_CSV: &str = "\
value,intent
not_found,general
hi hello hey,greeting
what genre be,game_genre_fact
what platform support,game_platform_fact
tell me about game,game_fact
recommend game,game_search
suggest platform,platform_recommendation
explore genre,genre_exploration
bye goodbye,goodbye
change my name,change_name
what be my name,announce_name
";

pub const INTENT_RESPONSE_CSV: &str = "\
intent,response
greeting,Hello @username! How can I help?
goodbye,Goodbye @username! See you soon.
";

pub const GAME_SEARCH_CSV: &str = "\
keyword,value,response,type
not_found,not_found,not_found,not_found
action,action,Action it is,genre
adventure,adventure,Adventure it is,genre
puzzle,puzzle,Puzzle it is,genre
any genre,na,Any genre works,genre
pc,pc,for PC,platform
computer,pc,for PC,platform
xbox,xbox,for Xbox,platform
playstation,playstation,for PlayStation,platform
any platform,na,for every platform,platform
";

pub const QUESTION_ANSWER_CSV: &str = "\
question,answer
not_found,\"Sorry, I don't know the answer to that.\"
what be my name,Your name is @username.
what time do you open,We are open from 9am to 9pm.
";

/// A temporary data directory with every corpus file written.
pub struct Fixture {
    pub dir: TempDir,
    pub config: ChatbotConfig,
    pub corpora: CorpusLibrary,
    pub prefs: PreferenceStore,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for (file, content) in [
            ("games.csv", GAMES_CSV),
            ("intent.csv", INTENT_CSV),
            ("intent_response.csv", INTENT_RESPONSE_CSV),
            ("game_search.csv", GAME_SEARCH_CSV),
            ("question_answer.csv", QUESTION_ANSWER_CSV),
        ] {
            fs::write(dir.path().join(file), content).unwrap();
        }
        let config = ChatbotConfig {
            data_dir: dir.path().to_path_buf(),
            preferences_path: dir.path().join("preferences.json"),
            ..ChatbotConfig::default()
        };
        let corpora = CorpusLibrary::new(&config.data_dir);
        let prefs = PreferenceStore::new(&config.preferences_path);
        Self {
            dir,
            config,
            corpora,
            prefs,
        }
    }

    /// The corpora shipped in `data/`, with preferences in a temporary file.
    pub fn shipped() -> Self {
        let dir = TempDir::new().unwrap();
        let config = ChatbotConfig {
            data_dir: shipped_data_dir(),
            preferences_path: dir.path().join("preferences.json"),
            ..ChatbotConfig::default()
        };
        let corpora = CorpusLibrary::new(&config.data_dir);
        let prefs = PreferenceStore::new(&config.preferences_path);
        Self {
            dir,
            config,
            corpora,
            prefs,
        }
    }

    pub fn ctx(&self) -> HandlerContext<'_> {
        HandlerContext {
            config: &self.config,
            corpora: &self.corpora,
            prefs: &self.prefs,
        }
    }
}

pub fn shipped_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
